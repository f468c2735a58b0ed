use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result, bail};
use schemsvg::{Config, DirectoryLibrary, SourceContext, convert, generate_svg};

#[derive(Parser, Debug)]
#[command(
    name = "schemsvg",
    version,
    about = "Convert a gEDA/gschem schematic (.sch) or symbol (.sym) to an SVG image"
)]
struct Cli {
    /// A .sch or .sym file to read
    #[arg(short, long)]
    in_file: PathBuf,

    /// The .svg file to write (default: the input path with an .svg extension)
    #[arg(short, long)]
    out_file: Option<PathBuf>,

    /// Extra symbol library directory, searched before the system library
    #[arg(short = 'L', long = "symbol-dir", env = "SCHEMSVG_SYMBOL_DIRS", value_delimiter = ':')]
    symbol_dirs: Vec<PathBuf>,

    /// Directory name to skip while searching for symbols
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Padding around the drawing
    #[arg(long)]
    margin: Option<i32>,

    /// Thinnest stroke drawn
    #[arg(long)]
    min_thickness: Option<i32>,

    /// Spacing between lines of multi-line text, as a multiple of the font size
    #[arg(long)]
    line_spacing: Option<f64>,
}

impl Cli {
    fn config(&self) -> Config {
        let defaults = Config::default();
        let roots = self.symbol_dirs.iter().cloned().chain(defaults.symbol_roots.clone());
        let excluded = defaults.excluded_dirs.iter().cloned().chain(self.exclude.iter().cloned());

        let mut config = defaults.clone().with_symbol_roots(roots).with_excluded_dirs(excluded);
        if let Some(margin) = self.margin {
            config = config.with_margin(margin);
        }
        if let Some(thickness) = self.min_thickness {
            config = config.with_min_thickness(thickness);
        }
        if let Some(spacing) = self.line_spacing {
            config = config.with_line_spacing(spacing);
        }
        config
    }

    fn output_path(&self) -> Result<PathBuf> {
        match &self.out_file {
            Some(path) if has_extension(path, &["svg"]) => Ok(path.clone()),
            Some(path) => bail!("output file {} must be an .svg file", path.display()),
            None => Ok(self.in_file.with_extension("svg")),
        }
    }
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.contains(&ext))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    if !has_extension(&cli.in_file, &["sch", "sym"]) {
        bail!("{} is not a schematic or symbol file", cli.in_file.display());
    }
    let out_file = cli.output_path()?;

    let source = fs::read_to_string(&cli.in_file)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not read {}", cli.in_file.display()))?;
    let ctx = SourceContext::new(cli.in_file.display().to_string(), source);
    let config = cli.config();
    let library = DirectoryLibrary::from_config(&config);

    let scene = convert(&ctx, &config, &library)?;
    for diagnostic in &scene.diagnostics {
        eprintln!("{:?}", miette::Report::new(diagnostic.clone()));
    }

    // only touch the output once the whole conversion went through
    let svg = generate_svg(&scene, &config);
    fs::write(&out_file, svg)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not write {}", out_file.display()))?;
    tracing::info!(output = %out_file.display(), "wrote svg");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn symbol_dirs_come_before_the_system_library() {
        let cli = Cli::parse_from(["schemsvg", "-i", "a.sch", "-L", "/tmp/syms", "--exclude", "old"]);
        let config = cli.config();
        assert_eq!(config.symbol_roots[0], PathBuf::from("/tmp/syms"));
        assert_eq!(config.symbol_roots.len(), 2);
        assert!(config.excluded_dirs.contains(&"gnetman".to_string()));
        assert!(config.excluded_dirs.contains(&"old".to_string()));
    }

    #[test]
    fn default_output_path() {
        let cli = Cli::parse_from(["schemsvg", "-i", "dir/amp.sch"]);
        assert_eq!(cli.output_path().unwrap(), PathBuf::from("dir/amp.svg"));
        let cli = Cli::parse_from(["schemsvg", "-i", "amp.sch", "-o", "amp.png"]);
        assert!(cli.output_path().is_err());
    }

    fn cli_for(input: &Path) -> Cli {
        let input = input.to_string_lossy().into_owned();
        Cli::parse_from(["schemsvg", "-i", input.as_str()])
    }

    #[test]
    fn malformed_input_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.sch");
        fs::write(&input, "N 0 0 100 0 4\nT 0 0 9 10 1 1 0 0 3\nonly one line\n").unwrap();

        assert!(run(cli_for(&input)).is_err());
        assert!(!dir.path().join("broken.svg").exists());
    }

    #[test]
    fn valid_input_writes_svg_next_to_it() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("net.sch");
        fs::write(&input, "N 0 0 100 0 4\n").unwrap();

        run(cli_for(&input)).unwrap();
        let svg = fs::read_to_string(dir.path().join("net.svg")).unwrap();
        assert!(svg.starts_with("<svg "));
    }
}
