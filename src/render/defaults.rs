//! Default sizes and settings (schematic units: mils)

pub const MIN_THICKNESS: i32 = 3;
pub const BUS_THICKNESS: i32 = 30;
pub const LINE_SPACING: f64 = 1.0;
pub const MARGIN: i32 = 1000;
pub const MAX_DEPTH: usize = 32;
pub const JUNCTION_RADIUS: i32 = 25;
pub const DANGLING_MARKER_SIZE: i32 = 60;

/// Largest magnitude accepted for any numeric field of a drawing record
pub const COORD_LIMIT: i32 = 1 << 24;
/// Largest magnitude a resolved coordinate may reach after nesting
pub const EXTENT_LIMIT: i32 = 1 << 28;
/// Margins are clamped to `0..=MAX_MARGIN`
pub const MAX_MARGIN: i32 = 1 << 24;

pub const SYMBOL_ROOTS: &[&str] = &["/usr/share/gEDA/sym/"];
/// Generated netlist caches live here and must not shadow real symbols
pub const EXCLUDED_DIRS: &[&str] = &["gnetman"];

/// Points to schematic units: text size `n` renders `n * 1000 / 72` high
pub const FONT_UNITS_PER_POINT_NUM: i32 = 1000;
pub const FONT_UNITS_PER_POINT_DEN: i32 = 72;

pub const BACKGROUND: &str = "#000000";
pub const JUNCTION_COLOR: &str = "#ffff00";
pub const DANGLING_COLOR: &str = "#ff0000";
pub const FALLBACK_COLOR: &str = "#ffffff";

#[rustfmt::skip]
pub const PALETTE: [&str; 24] = [
    "#000000", "#ffffff", "#ff0000", "#00ff00",
    "#0000ff", "#ffff00", "#00ffff", "#bebebe",
    "#ff0000", "#00ff00", "#00ff00", "#ffa500",
    "#ffa500", "#00ffff", "#e5e5e5", "#bebebe",
    "#00ff00", "#00ff00", "#00ff00", "#00ff00",
    "#00ff00", "#ffff00", "#1e1e1e", "#171717",
];
