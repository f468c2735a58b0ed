//! Record types for the gschem schematic/symbol format
//!
//! These types represent the parsed structure of one `.sch` or `.sym` file.
//! Records are created once by the parser and only read afterwards.

use glam::IVec2;

use crate::transform::Rotation;
use crate::types::ColorIndex;

/// One schematic element together with the attributes attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    pub object: Object,
    /// Decoded `{ }` block following the record (empty when absent)
    pub attributes: Vec<Attribute>,
    /// 1-based line number of the header, for diagnostics
    pub line: usize,
}

/// Every record kind the converter knows about.
///
/// Kinds without a schema are kept as [`Object::Other`] so later passes can
/// skip them uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// `L`: graphical line
    Line(Line),
    /// `N`: net segment
    Net(Net),
    /// `U`: bus segment
    Bus(Bus),
    /// `P`: pin
    Pin(Pin),
    /// `B`: box
    Box(BoxObject),
    /// `T`: free-standing text
    Text(Text),
    /// `H`: path
    Path(Path),
    /// `A`: arc
    Arc(Arc),
    /// `V`: circle
    Circle(Circle),
    /// `C`: component instance
    Component(Component),
    /// Anything else (`v`, `G`, `F`, ...)
    Other(Opaque),
}

impl Object {
    /// The single-letter tag this object was written with
    pub fn tag(&self) -> &str {
        match self {
            Object::Line(_) => "L",
            Object::Net(_) => "N",
            Object::Bus(_) => "U",
            Object::Pin(_) => "P",
            Object::Box(_) => "B",
            Object::Text(_) => "T",
            Object::Path(_) => "H",
            Object::Arc(_) => "A",
            Object::Circle(_) => "V",
            Object::Component(_) => "C",
            Object::Other(o) => &o.tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub from: IVec2,
    pub to: IVec2,
    pub color: ColorIndex,
    pub width: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Net {
    pub from: IVec2,
    pub to: IVec2,
    pub color: ColorIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bus {
    pub from: IVec2,
    pub to: IVec2,
    pub color: ColorIndex,
    pub ripper_direction: i32,
}

/// Electrical type of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    Normal,
    Bus,
}

/// Which end of a pin connects to the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEnd {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub from: IVec2,
    pub to: IVec2,
    pub color: ColorIndex,
    pub kind: PinKind,
    pub active_end: PinEnd,
}

impl Pin {
    /// The free end of the pin, the one nets attach to
    pub fn connection_point(&self) -> IVec2 {
        match self.active_end {
            PinEnd::First => self.from,
            PinEnd::Second => self.to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxObject {
    /// Lower-left corner
    pub corner: IVec2,
    pub size: IVec2,
    pub color: ColorIndex,
    pub width: i32,
    pub filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub center: IVec2,
    pub radius: i32,
    pub color: ColorIndex,
    pub width: i32,
    pub filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub center: IVec2,
    pub radius: i32,
    /// Degrees, counter-clockwise from +x
    pub start_angle: i32,
    /// Degrees, positive is counter-clockwise
    pub sweep_angle: i32,
    pub color: ColorIndex,
    pub width: i32,
}

/// What part of a `name=value` string is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowMode {
    NameValue,
    Value,
    Name,
}

/// Header fields shared by free-standing text and attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextHeader {
    pub origin: IVec2,
    pub color: ColorIndex,
    /// Font size in points
    pub size: i32,
    pub visible: bool,
    pub show: ShowMode,
    /// Degrees, counter-clockwise
    pub angle: i32,
    /// 0..=8, column-major 3x3 grid: `alignment / 3` is the horizontal
    /// anchor, `alignment % 3` the vertical one
    pub alignment: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub header: TextHeader,
    pub lines: Vec<String>,
}

impl Text {
    /// The attribute name if this text has `name=value` form
    pub fn attribute_name(&self) -> Option<&str> {
        self.lines
            .first()
            .and_then(|first| first.split_once('='))
            .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub color: ColorIndex,
    pub width: i32,
    pub filled: bool,
    /// Commands with every point made absolute
    pub commands: Vec<PathCommand>,
}

/// One absolute path command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    MoveTo(IVec2),
    LineTo(IVec2),
    CurveTo(IVec2, IVec2, IVec2),
    Close,
}

impl PathCommand {
    /// Visit every point the command mentions, control points included
    pub fn for_each_point(&self, mut f: impl FnMut(IVec2)) {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => f(p),
            PathCommand::CurveTo(c1, c2, p) => {
                f(c1);
                f(c2);
                f(p);
            }
            PathCommand::Close => {}
        }
    }
}

/// A component placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub origin: IVec2,
    pub selectable: bool,
    pub rotation: Rotation,
    pub mirrored: bool,
    pub basename: String,
    /// Raw `[ ]` body of an embedded symbol
    pub embedded: Option<String>,
}

impl Component {
    pub fn is_embedded(&self) -> bool {
        self.embedded.is_some()
    }
}

/// A record kind without a schema, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub tag: String,
    pub fields: Vec<String>,
}

/// One decoded `name=value` attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub header: TextHeader,
    pub key: String,
    pub value: String,
}
