//! SVG generation
//!
//! A thin serialization of [`Scene`]: every decision about geometry, color
//! index, stroke and text content has already been made by the render pass.

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::ast::PathCommand;
use crate::config::{Config, Palette};

use super::defaults;
use super::types::*;

/// Serialize one primitive as an SVG element
#[enum_dispatch]
pub trait SvgElement {
    fn write_svg(&self, out: &mut String, palette: &Palette);
}

/// Format a coordinate with at most three decimals, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

fn fmt_point(p: DVec2) -> String {
    format!("{} {}", fmt_num(p.x), fmt_num(p.y))
}

/// Escape text content for XML
fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            c => result.push(c),
        }
    }
    result
}

fn fill(filled: bool, color: &str) -> &str {
    if filled { color } else { "none" }
}

impl SvgElement for LineShape {
    fn write_svg(&self, out: &mut String, palette: &Palette) {
        out.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
            self.from.x,
            self.from.y,
            self.to.x,
            self.to.y,
            palette.color(self.color),
            self.width
        ));
    }
}

impl SvgElement for RectShape {
    fn write_svg(&self, out: &mut String, palette: &Palette) {
        let color = palette.color(self.color);
        out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"{}\"/>\n",
            self.origin.x,
            self.origin.y,
            self.size.x,
            self.size.y,
            color,
            self.width,
            fill(self.filled, color)
        ));
    }
}

impl SvgElement for CircleShape {
    fn write_svg(&self, out: &mut String, palette: &Palette) {
        let color = palette.color(self.color);
        out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"{}\"/>\n",
            self.center.x,
            self.center.y,
            self.radius,
            color,
            self.width,
            fill(self.filled, color)
        ));
    }
}

impl SvgElement for ArcShape {
    fn write_svg(&self, out: &mut String, palette: &Palette) {
        out.push_str(&format!(
            "<path d=\"M {} A {} {} 0 {} {} {}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>\n",
            fmt_point(self.start),
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            u8::from(self.sweep),
            fmt_point(self.end),
            palette.color(self.color),
            self.width
        ));
    }
}

impl SvgElement for PathShape {
    fn write_svg(&self, out: &mut String, palette: &Palette) {
        let d = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(p) => format!("M {} {}", p.x, p.y),
                PathCommand::LineTo(p) => format!("L {} {}", p.x, p.y),
                PathCommand::CurveTo(c1, c2, p) => {
                    format!("C {} {} {} {} {} {}", c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathCommand::Close => "Z".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        let color = palette.color(self.color);
        out.push_str(&format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"{}\"/>\n",
            d,
            color,
            self.width,
            fill(self.filled, color)
        ));
    }
}

impl SvgElement for TextShape {
    fn write_svg(&self, out: &mut String, palette: &Palette) {
        let mut transform = format!("translate({}, {})", fmt_num(self.position.x), fmt_num(self.position.y));
        if self.rotation != 0 {
            transform.push_str(&format!(" rotate({})", self.rotation));
        }
        out.push_str(&format!(
            "<text text-anchor=\"{}\" dominant-baseline=\"{}\" transform=\"{}\" fill=\"{}\" font-size=\"{}\">",
            self.anchor.as_str(),
            self.baseline.as_str(),
            transform,
            palette.color(self.color),
            fmt_num(self.font_size)
        ));
        for span in &self.spans {
            if span.overline {
                out.push_str("<tspan text-decoration=\"overline\">");
            } else {
                out.push_str("<tspan>");
            }
            out.push_str(&escape_text(&span.text));
            out.push_str("</tspan>");
        }
        out.push_str("</text>\n");
    }
}

fn write_marker(out: &mut String, marker: &Marker, config: &Config) {
    let p = marker.point;
    match marker.kind {
        MarkerKind::Junction => out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
            p.x,
            p.y,
            config.junction_radius,
            defaults::JUNCTION_COLOR
        )),
        MarkerKind::Dangling => {
            let size = config.dangling_marker_size;
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                p.x - size / 2,
                p.y - size / 2,
                size,
                size,
                defaults::DANGLING_COLOR
            ));
        }
    }
}

/// Serialize a scene: background, primitives in walk order, then markers
pub fn generate_svg(scene: &Scene, config: &Config) -> String {
    let (w, h) = (scene.width, scene.height);
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\">\n"
    ));
    out.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{}\"/>\n",
        defaults::BACKGROUND
    ));
    for primitive in &scene.primitives {
        primitive.write_svg(&mut out, &config.palette);
    }
    for marker in &scene.markers {
        write_marker(&mut out, marker, config);
    }
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorIndex;
    use glam::{dvec2, ivec2};

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(1000.0), "1000");
        assert_eq!(fmt_num(138.888_888), "138.889");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-0.000_1), "0");
    }

    #[test]
    fn text_spans_and_escaping() {
        let text = TextShape {
            position: dvec2(10.0, 20.5),
            spans: vec![
                TextSpan {
                    text: "A<B".into(),
                    overline: false,
                },
                TextSpan {
                    text: "RST".into(),
                    overline: true,
                },
            ],
            color: ColorIndex(9),
            font_size: 100.0,
            anchor: Anchor::Middle,
            baseline: Baseline::Hanging,
            rotation: 90,
        };
        let mut out = String::new();
        text.write_svg(&mut out, &Palette::default());
        assert_eq!(
            out,
            "<text text-anchor=\"middle\" dominant-baseline=\"hanging\" \
             transform=\"translate(10, 20.5) rotate(90)\" fill=\"#00ff00\" font-size=\"100\">\
             <tspan>A&lt;B</tspan><tspan text-decoration=\"overline\">RST</tspan></text>\n"
        );
    }

    #[test]
    fn unknown_colors_fall_back_to_white() {
        let line = LineShape {
            from: ivec2(0, 0),
            to: ivec2(1, 1),
            color: ColorIndex(200),
            width: 3,
            kind: LineKind::Graphic,
        };
        let mut out = String::new();
        Primitive::from(line).write_svg(&mut out, &Palette::default());
        assert!(out.contains("stroke=\"#ffffff\""), "{out}");
    }

    #[test]
    fn markers_are_centred() {
        let scene = Scene {
            width: 100,
            height: 100,
            primitives: vec![],
            markers: vec![
                Marker {
                    kind: MarkerKind::Dangling,
                    point: ivec2(50, 50),
                },
                Marker {
                    kind: MarkerKind::Junction,
                    point: ivec2(10, 10),
                },
            ],
            diagnostics: vec![],
        };
        let svg = generate_svg(&scene, &Config::default());
        assert!(svg.contains("<rect x=\"20\" y=\"20\" width=\"60\" height=\"60\" fill=\"#ff0000\"/>"));
        assert!(svg.contains("<circle cx=\"10\" cy=\"10\" r=\"25\" fill=\"#ffff00\"/>"));
    }
}
