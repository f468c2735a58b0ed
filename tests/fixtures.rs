//! Converts every schematic and symbol under `tests/fixtures` and checks the
//! structural properties every scene must have.

use std::path::PathBuf;

use datatest_stable::Utf8Path;
use glam::{DVec2, IVec2, ivec2};
use schemsvg::ast::PathCommand;
use schemsvg::render::{MarkerKind, Primitive, Scene};
use schemsvg::{Config, DirectoryLibrary, SourceContext, convert, generate_svg};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn config() -> Config {
    Config::default().with_symbol_roots([PathBuf::from(FIXTURES).join("symbols")])
}

fn check_point(scene: &Scene, p: IVec2, what: &str) -> Result<(), String> {
    if (0..=scene.width).contains(&p.x) && (0..=scene.height).contains(&p.y) {
        Ok(())
    } else {
        Err(format!(
            "{what} at {p} lies outside the {}x{} canvas",
            scene.width, scene.height
        ))
    }
}

fn check_point_f(scene: &Scene, p: DVec2, what: &str) -> Result<(), String> {
    const EPS: f64 = 1e-6;
    let inside = p.x >= -EPS
        && p.y >= -EPS
        && p.x <= f64::from(scene.width) + EPS
        && p.y <= f64::from(scene.height) + EPS;
    if inside {
        Ok(())
    } else {
        Err(format!("{what} at {p} lies outside the canvas"))
    }
}

/// Scene bounds must enclose every piece of geometry
fn check_geometry(scene: &Scene, config: &Config) -> Result<(), String> {
    for primitive in &scene.primitives {
        match primitive {
            Primitive::Line(line) => {
                check_point(scene, line.from, "line start")?;
                check_point(scene, line.to, "line end")?;
                if line.width < config.min_thickness {
                    return Err(format!("line {line:?} is thinner than the floor"));
                }
            }
            Primitive::Rect(rect) => {
                if rect.size.x < 0 || rect.size.y < 0 {
                    return Err(format!("rect {rect:?} has a negative size"));
                }
                check_point(scene, rect.origin, "rect corner")?;
                check_point(scene, rect.origin + rect.size, "rect corner")?;
            }
            Primitive::Circle(circle) => {
                let r = ivec2(circle.radius, circle.radius);
                check_point(scene, circle.center - r, "circle extent")?;
                check_point(scene, circle.center + r, "circle extent")?;
            }
            Primitive::Arc(arc) => {
                check_point_f(scene, arc.start, "arc start")?;
                check_point_f(scene, arc.end, "arc end")?;
            }
            Primitive::Path(path) => {
                for command in &path.commands {
                    let mut result = Ok(());
                    command.for_each_point(|p| {
                        if result.is_ok() {
                            result = check_point(scene, p, "path point");
                        }
                    });
                    result?;
                }
                if !matches!(path.commands.first(), Some(PathCommand::MoveTo(_))) {
                    return Err("path does not start with a move".to_string());
                }
            }
            // attribute text may sit anywhere relative to its owner
            Primitive::Text(text) => {
                if text.font_size <= 0.0 {
                    return Err(format!("text {:?} has no size", text.plain_text()));
                }
            }
        }
    }
    for marker in &scene.markers {
        check_point(scene, marker.point, "marker")?;
    }
    Ok(())
}

/// Every marker must sit on the end of some line
fn check_markers(scene: &Scene) -> Result<(), String> {
    for marker in scene.markers_of(MarkerKind::Dangling) {
        if !scene.lines().any(|l| l.from == marker.point || l.to == marker.point) {
            return Err(format!("dangling marker at {} is not on any line end", marker.point));
        }
    }
    Ok(())
}

fn convert_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let ctx = SourceContext::new(path.as_str(), source);
    let config = config();
    let library = DirectoryLibrary::from_config(&config);

    let scene = convert(&ctx, &config, &library)?;
    check_geometry(&scene, &config)?;
    check_markers(&scene)?;

    let expect_missing = path.file_stem().is_some_and(|stem| stem.starts_with("missing"));
    if expect_missing == scene.diagnostics.is_empty() {
        return Err(format!(
            "{path}: expected missing symbols: {expect_missing}, got {:?}",
            scene.diagnostics
        )
        .into());
    }

    let svg = generate_svg(&scene, &config);
    if !svg.starts_with("<svg ") || !svg.ends_with("</svg>\n") {
        return Err(format!("{path}: not a complete svg document").into());
    }

    let again = convert(&ctx, &config, &library)?;
    if again != scene {
        return Err(format!("{path}: conversion is not deterministic").into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = convert_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.(sch|sym)$" },
}
