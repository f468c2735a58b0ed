//! Small geometric and styling value types shared across the pipeline.

use std::fmt;

use glam::{IVec2, ivec2};

use crate::transform::Placement;

/// Index into the design-system [`Palette`](crate::config::Palette)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct ColorIndex(pub usize);

impl fmt::Display for ColorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color {}", self.0)
    }
}

/// Axis-aligned bounding box in schematic units (Y up)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: IVec2,
    pub max: IVec2,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BoundingBox {
            min: IVec2::MAX,
            max: IVec2::MIN,
        }
    }

    /// Box spanning two arbitrary corners
    pub fn from_corners(a: IVec2, b: IVec2) -> Self {
        BoundingBox {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: IVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand to include a square of half-size `radius` around `center`
    pub fn expand_radius(&mut self, center: IVec2, radius: i32) {
        let r = ivec2(radius.abs(), radius.abs());
        self.expand_point(center - r);
        self.expand_point(center + r);
    }

    /// Expand to include another box. Empty boxes contribute nothing.
    pub fn expand_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.expand_point(other.min);
        self.expand_point(other.max);
    }

    /// The box enclosing all four corners after a pre-transform
    pub fn transformed(&self, placement: &Placement) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let mut out = BoundingBox::new();
        for corner in self.corners() {
            out.expand_point(placement.apply(corner));
        }
        out
    }

    pub fn corners(&self) -> [IVec2; 4] {
        [
            self.min,
            ivec2(self.max.x, self.min.y),
            self.max,
            ivec2(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() { 0 } else { self.max.x - self.min.x }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() { 0 } else { self.max.y - self.min.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Rotation;

    #[test]
    fn bbox_new_is_empty() {
        let bb = BoundingBox::new();
        assert!(bb.is_empty());
        assert_eq!(bb.width(), 0);
    }

    #[test]
    fn bbox_expand_point() {
        let mut bb = BoundingBox::new();
        bb.expand_point(ivec2(1, 2));
        bb.expand_point(ivec2(3, -4));

        assert!(!bb.is_empty());
        assert_eq!(bb.min, ivec2(1, -4));
        assert_eq!(bb.max, ivec2(3, 2));
        assert_eq!(bb.width(), 2);
        assert_eq!(bb.height(), 6);
    }

    #[test]
    fn bbox_expand_radius() {
        let mut bb = BoundingBox::new();
        bb.expand_radius(ivec2(100, 100), 50);
        assert_eq!(bb.min, ivec2(50, 50));
        assert_eq!(bb.max, ivec2(150, 150));
    }

    #[test]
    fn empty_box_does_not_grow_others() {
        let mut bb = BoundingBox::from_corners(ivec2(0, 0), ivec2(10, 10));
        bb.expand_box(&BoundingBox::new());
        assert_eq!(bb, BoundingBox::from_corners(ivec2(0, 0), ivec2(10, 10)));
    }

    #[test]
    fn expanding_never_shrinks() {
        let mut bb = BoundingBox::from_corners(ivec2(-5, -5), ivec2(5, 5));
        let before = bb;
        for p in [ivec2(0, 0), ivec2(3, -2), ivec2(100, 7), ivec2(-40, -40)] {
            bb.expand_point(p);
            assert!(bb.contains(before.min) && bb.contains(before.max));
            assert!(bb.contains(p));
        }
    }

    #[test]
    fn transformed_box_rotates_corners() {
        let bb = BoundingBox::from_corners(ivec2(0, 0), ivec2(200, 100));
        let placement = Placement::new(ivec2(1000, 1000), Rotation::R90, false);
        let out = bb.transformed(&placement);
        // (x, y) -> (-y, x) then offset
        assert_eq!(out.min, ivec2(900, 1000));
        assert_eq!(out.max, ivec2(1000, 1200));
    }
}
