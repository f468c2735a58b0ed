//! Output primitives handed to the emitter
//!
//! Everything here is already in output space (Y down, margin-padded) with
//! strokes floored and text fully substituted. The emitter only serializes.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, IVec2};

use crate::ast::PathCommand;
// named by the dispatch impl enum_dispatch generates for `Primitive`
#[allow(unused_imports)]
use crate::config::Palette;
use crate::errors::SymbolNotFound;
use crate::types::ColorIndex;

use super::svg::SvgElement;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Vertical text baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Text sits on the anchor point
    Alphabetic,
    Middle,
    /// Text hangs below the anchor point
    Hanging,
}

impl Baseline {
    pub fn as_str(self) -> &'static str {
        match self {
            Baseline::Alphabetic => "alphabetic",
            Baseline::Middle => "middle",
            Baseline::Hanging => "hanging",
        }
    }
}

/// What a straight line stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Graphic,
    Net,
    Bus,
    Pin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub from: IVec2,
    pub to: IVec2,
    pub color: ColorIndex,
    pub width: i32,
    pub kind: LineKind,
}

/// Axis-aligned rectangle; `origin` is the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub origin: IVec2,
    pub size: IVec2,
    pub color: ColorIndex,
    pub width: i32,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub center: IVec2,
    pub radius: i32,
    pub color: ColorIndex,
    pub width: i32,
    pub filled: bool,
}

/// Elliptical-arc segment in SVG endpoint form
#[derive(Debug, Clone, PartialEq)]
pub struct ArcShape {
    pub start: DVec2,
    pub end: DVec2,
    pub radius: i32,
    pub large_arc: bool,
    /// SVG sweep flag: clockwise on screen
    pub sweep: bool,
    pub color: ColorIndex,
    pub width: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub commands: Vec<PathCommand>,
    pub color: ColorIndex,
    pub width: i32,
    pub filled: bool,
}

/// A run of text that is either overlined or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub overline: bool,
}

/// One line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub position: DVec2,
    pub spans: Vec<TextSpan>,
    pub color: ColorIndex,
    pub font_size: f64,
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Clockwise degrees in output space
    pub rotation: i32,
}

impl TextShape {
    /// The displayed string without overline markup
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[enum_dispatch(SvgElement)]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(LineShape),
    Rect(RectShape),
    Circle(CircleShape),
    Arc(ArcShape),
    Path(PathShape),
    Text(TextShape),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Junction,
    Dangling,
}

/// Connectivity annotation at an output-space point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub point: IVec2,
}

/// A fully resolved, fully transformed drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: i32,
    pub height: i32,
    pub primitives: Vec<Primitive>,
    pub markers: Vec<Marker>,
    /// Non-fatal problems met on the way
    pub diagnostics: Vec<SymbolNotFound>,
}

impl Scene {
    pub fn lines(&self) -> impl Iterator<Item = &LineShape> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextShape> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }
}
