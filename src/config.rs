//! Conversion settings, fixed for the whole run.

use std::path::PathBuf;

use crate::render::defaults;
use crate::types::ColorIndex;

/// Fixed color table indexed by the records' color fields (gschem dark map)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new(defaults::PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        Palette { colors }
    }

    /// CSS color for an index; unknown indices fall back to white
    pub fn color(&self, index: ColorIndex) -> &str {
        self.colors
            .get(index.0)
            .map(String::as_str)
            .unwrap_or(defaults::FALLBACK_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Everything the core consumes from the outside. Built once, then only read.
#[derive(Debug, Clone)]
pub struct Config {
    /// Floor for every stroke width
    pub min_thickness: i32,
    /// Stroke width of busses and bus pins
    pub bus_thickness: i32,
    /// Spacing between lines of multi-line text, as a multiple of font size
    pub line_spacing: f64,
    /// Padding around the drawing in output space
    pub margin: i32,
    /// Library roots, searched in order
    pub symbol_roots: Vec<PathBuf>,
    /// Directory names skipped during the library search
    pub excluded_dirs: Vec<String>,
    /// Deepest allowed symbol nesting
    pub max_depth: usize,
    pub junction_radius: i32,
    pub dangling_marker_size: i32,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_thickness: defaults::MIN_THICKNESS,
            bus_thickness: defaults::BUS_THICKNESS,
            line_spacing: defaults::LINE_SPACING,
            margin: defaults::MARGIN,
            symbol_roots: defaults::SYMBOL_ROOTS.iter().map(PathBuf::from).collect(),
            excluded_dirs: defaults::EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_depth: defaults::MAX_DEPTH,
            junction_radius: defaults::JUNCTION_RADIUS,
            dangling_marker_size: defaults::DANGLING_MARKER_SIZE,
            palette: Palette::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the library roots
    pub fn with_symbol_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.symbol_roots = roots.into_iter().collect();
        self
    }

    pub fn with_excluded_dirs(mut self, dirs: impl IntoIterator<Item = String>) -> Self {
        self.excluded_dirs = dirs.into_iter().collect();
        self
    }

    /// Set the padding, clamped to `0..=MAX_MARGIN`
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin.clamp(0, defaults::MAX_MARGIN);
        self
    }

    pub fn with_min_thickness(mut self, thickness: i32) -> Self {
        self.min_thickness = thickness;
        self
    }

    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = spacing;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Stroke width after applying the visibility floor
    pub fn stroke(&self, width: i32) -> i32 {
        width.max(self.min_thickness)
    }
}
