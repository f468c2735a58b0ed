//! Text layout: what string is shown, and how it is anchored and turned.

use glam::{DVec2, dvec2};

use crate::ast::ShowMode;

use super::defaults;
use super::types::{Anchor, Baseline, TextSpan};

/// Escape that toggles overlining inside a text line
const OVERLINE_TOGGLE: &str = "\\_";

/// The visible part of a `name=value` string
pub fn display_attribute(key: &str, value: &str, show: ShowMode) -> String {
    match show {
        ShowMode::NameValue => format!("{key}={value}"),
        ShowMode::Value => value.to_string(),
        ShowMode::Name => key.to_string(),
    }
}

/// Apply the show mode to free-standing text; text without `=` is shown as-is
pub fn display_text(text: &str, show: ShowMode) -> String {
    match text.split_once('=') {
        Some((key, value)) => display_attribute(key, value, show),
        None => text.to_string(),
    }
}

/// Split a line at `\_` toggles. Empty runs are dropped.
pub fn overline_spans(line: &str) -> Vec<TextSpan> {
    line.split(OVERLINE_TOGGLE)
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(i, text)| TextSpan {
            text: text.to_string(),
            overline: i % 2 == 1,
        })
        .collect()
}

/// Font size in schematic units for a size given in points
pub fn font_size(size: i32) -> f64 {
    f64::from(size) * f64::from(defaults::FONT_UNITS_PER_POINT_NUM) / f64::from(defaults::FONT_UNITS_PER_POINT_DEN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Clockwise degrees in output space
    pub rotation: i32,
}

/// Anchor, baseline and output rotation for text.
///
/// `alignment` is the 0..=8 grid code (column = alignment / 3 picks the
/// anchor, row = alignment % 3 the baseline). `angle` is the net
/// counter-clockwise angle in schematic space. A mirrored frame flips the
/// column. At exactly 180 degrees the text is drawn upright with both
/// anchor and baseline swapped instead of upside down.
pub fn layout(alignment: u8, angle: i32, mirrored: bool) -> TextLayout {
    let column = usize::from(alignment / 3);
    let column = if mirrored { 2 - column } else { column };
    let row = usize::from(alignment % 3);
    let angle = angle.rem_euclid(360);

    if angle == 180 {
        TextLayout {
            anchor: [Anchor::End, Anchor::Middle, Anchor::Start][column],
            baseline: [Baseline::Hanging, Baseline::Middle, Baseline::Alphabetic][row],
            rotation: 0,
        }
    } else {
        TextLayout {
            anchor: [Anchor::Start, Anchor::Middle, Anchor::End][column],
            baseline: [Baseline::Alphabetic, Baseline::Middle, Baseline::Hanging][row],
            rotation: (360 - angle) % 360,
        }
    }
}

/// Output-space origins of `count` stacked lines starting at `first`.
///
/// Lines advance along the text's own downward direction.
pub fn line_origins(first: DVec2, count: usize, rotation: i32, font_size: f64, spacing: f64) -> Vec<DVec2> {
    let theta = f64::from(rotation).to_radians();
    let down = dvec2(-theta.sin(), theta.cos());
    (0..count)
        .map(|i| first + down * (i as f64 * spacing * font_size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_modes() {
        assert_eq!(display_attribute("refdes", "R1", ShowMode::NameValue), "refdes=R1");
        assert_eq!(display_attribute("refdes", "R1", ShowMode::Value), "R1");
        assert_eq!(display_attribute("refdes", "R1", ShowMode::Name), "refdes");
        assert_eq!(display_text("plain words", ShowMode::Value), "plain words");
        assert_eq!(display_text("a=b=c", ShowMode::Value), "b=c");
    }

    #[test]
    fn overline_toggles() {
        let spans = overline_spans("\\_RESET\\_ and EN");
        assert_eq!(
            spans,
            vec![
                TextSpan {
                    text: "RESET".into(),
                    overline: true
                },
                TextSpan {
                    text: " and EN".into(),
                    overline: false
                },
            ]
        );
        assert_eq!(overline_spans("plain").len(), 1);
        assert!(overline_spans("").is_empty());
    }

    #[test]
    fn font_size_converts_points() {
        assert!((font_size(10) - 138.888_888).abs() < 1e-3);
        assert_eq!(font_size(72), 1000.0);
    }

    #[test]
    fn alignment_grid() {
        let l = layout(0, 0, false);
        assert_eq!((l.anchor, l.baseline, l.rotation), (Anchor::Start, Baseline::Alphabetic, 0));
        let l = layout(5, 0, false);
        assert_eq!((l.anchor, l.baseline), (Anchor::Middle, Baseline::Hanging));
        let l = layout(7, 90, false);
        assert_eq!((l.anchor, l.baseline, l.rotation), (Anchor::End, Baseline::Middle, 270));
    }

    #[test]
    fn mirroring_flips_the_column() {
        assert_eq!(layout(0, 0, true).anchor, Anchor::End);
        assert_eq!(layout(4, 0, true).anchor, Anchor::Middle);
        assert_eq!(layout(8, 0, true).anchor, Anchor::Start);
    }

    #[test]
    fn half_turn_swaps_without_rotating() {
        let l = layout(0, 180, false);
        assert_eq!((l.anchor, l.baseline, l.rotation), (Anchor::End, Baseline::Hanging, 0));
        let l = layout(2, 180, true);
        assert_eq!((l.anchor, l.baseline), (Anchor::Start, Baseline::Alphabetic));
    }

    #[test]
    fn lines_stack_downwards() {
        let origins = line_origins(dvec2(100.0, 100.0), 3, 0, 50.0, 1.0);
        assert_eq!(origins, vec![dvec2(100.0, 100.0), dvec2(100.0, 150.0), dvec2(100.0, 200.0)]);

        let origins = line_origins(dvec2(0.0, 0.0), 2, 270, 10.0, 2.0);
        assert!((origins[1] - dvec2(20.0, 0.0)).length() < 1e-9);
    }
}
