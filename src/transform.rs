//! Coordinate-space conversions.
//!
//! Two mappings are kept apart on purpose:
//!
//! - [`Placement`] is the *pre-transform* (local to parent-local): mirror,
//!   quarter-turn rotation, then the placement offset. It composes across
//!   nesting levels and is what bounds aggregation uses.
//! - [`OutputTransform`] is the *post-transform* (schematic to output space):
//!   shift by the scene bounds, flip Y and pad with a margin. It can only be
//!   built from [`SceneBounds`], which in turn only exists once symbol
//!   resolution has finished, so no output coordinate can be computed against
//!   partial bounds.

use glam::{DVec2, IVec2, dvec2, ivec2};

use crate::render::defaults;
use crate::types::BoundingBox;

/// A quarter-turn rotation, counter-clockwise in schematic space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Accepts 0, 90, 180 and 270 (and their equivalents modulo 360)
    pub fn from_degrees(degrees: i32) -> Option<Rotation> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    fn quarter_turns(self) -> i32 {
        self.degrees() / 90
    }

    fn from_quarter_turns(turns: i32) -> Rotation {
        match turns.rem_euclid(4) {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    pub fn plus(self, other: Rotation) -> Rotation {
        Rotation::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    pub fn inverse(self) -> Rotation {
        Rotation::from_quarter_turns(-self.quarter_turns())
    }

    pub fn rotate(self, p: IVec2) -> IVec2 {
        match self {
            Rotation::R0 => p,
            Rotation::R90 => ivec2(-p.y, p.x),
            Rotation::R180 => ivec2(-p.x, -p.y),
            Rotation::R270 => ivec2(p.y, -p.x),
        }
    }

    pub fn rotate_f(self, p: DVec2) -> DVec2 {
        match self {
            Rotation::R0 => p,
            Rotation::R90 => dvec2(-p.y, p.x),
            Rotation::R180 => dvec2(-p.x, -p.y),
            Rotation::R270 => dvec2(p.y, -p.x),
        }
    }
}

/// Local-to-parent placement of a symbol or object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Placement {
    pub offset: IVec2,
    pub rotation: Rotation,
    pub mirrored: bool,
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        offset: IVec2::ZERO,
        rotation: Rotation::R0,
        mirrored: false,
    };

    pub fn new(offset: IVec2, rotation: Rotation, mirrored: bool) -> Self {
        Placement {
            offset,
            rotation,
            mirrored,
        }
    }

    /// Mirror (negate X), rotate, then translate
    pub fn apply(&self, p: IVec2) -> IVec2 {
        let p = if self.mirrored { ivec2(-p.x, p.y) } else { p };
        self.rotation.rotate(p) + self.offset
    }

    pub fn apply_f(&self, p: DVec2) -> DVec2 {
        let p = if self.mirrored { dvec2(-p.x, p.y) } else { p };
        self.rotation.rotate_f(p) + self.offset.as_dvec2()
    }

    /// Exact inverse of [`Placement::apply`]
    pub fn invert(&self, p: IVec2) -> IVec2 {
        let p = self.rotation.inverse().rotate(p - self.offset);
        if self.mirrored { ivec2(-p.x, p.y) } else { p }
    }

    /// The placement equivalent to applying `inner` first and then `self`.
    ///
    /// A mirrored outer frame reverses the sense of the inner rotation.
    pub fn compose(&self, inner: &Placement) -> Placement {
        let inner_rotation = if self.mirrored {
            inner.rotation.inverse()
        } else {
            inner.rotation
        };
        Placement {
            offset: self.apply(inner.offset),
            rotation: self.rotation.plus(inner_rotation),
            mirrored: self.mirrored ^ inner.mirrored,
        }
    }

    /// Net angle in degrees (0..360) of something drawn at `angle` inside
    /// this frame
    pub fn orient_angle(&self, angle: i32) -> i32 {
        let own = if self.mirrored { -angle } else { angle };
        (self.rotation.degrees() + own).rem_euclid(360)
    }
}

/// Bounds of the fully resolved scene. Only symbol resolution can produce it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneBounds {
    bbox: BoundingBox,
}

impl SceneBounds {
    /// Freeze the accumulated bounds; an empty scene collapses to the origin.
    pub(crate) fn finalize(bbox: BoundingBox) -> SceneBounds {
        if bbox.is_empty() {
            SceneBounds {
                bbox: BoundingBox::from_corners(IVec2::ZERO, IVec2::ZERO),
            }
        } else {
            SceneBounds { bbox }
        }
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// Schematic space (Y up) to output space (Y down, margin-padded)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputTransform {
    min_x: i32,
    max_y: i32,
    margin: i32,
    size: IVec2,
}

impl OutputTransform {
    pub fn new(bounds: &SceneBounds, margin: i32) -> Self {
        let bbox = bounds.bbox();
        let margin = margin.clamp(0, defaults::MAX_MARGIN);
        OutputTransform {
            min_x: bbox.min.x,
            max_y: bbox.max.y,
            margin,
            size: ivec2(bbox.width() + 2 * margin, bbox.height() + 2 * margin),
        }
    }

    pub fn to_output(&self, p: IVec2) -> IVec2 {
        ivec2(
            p.x - self.min_x + self.margin,
            self.max_y - p.y + self.margin,
        )
    }

    pub fn to_output_f(&self, p: DVec2) -> DVec2 {
        dvec2(
            p.x - f64::from(self.min_x) + f64::from(self.margin),
            f64::from(self.max_y) - p.y + f64::from(self.margin),
        )
    }

    /// Width and height of the padded output canvas
    pub fn canvas_size(&self) -> IVec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [IVec2; 5] = [
        IVec2::new(0, 0),
        IVec2::new(100, 0),
        IVec2::new(-300, 250),
        IVec2::new(47, -13),
        IVec2::new(1200, 900),
    ];

    #[test]
    fn quarter_turn_table() {
        let p = ivec2(3, 1);
        assert_eq!(Rotation::R0.rotate(p), ivec2(3, 1));
        assert_eq!(Rotation::R90.rotate(p), ivec2(-1, 3));
        assert_eq!(Rotation::R180.rotate(p), ivec2(-3, -1));
        assert_eq!(Rotation::R270.rotate(p), ivec2(1, -3));
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::R90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::R270));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::R90));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn pre_transform_round_trips() {
        for rotation in Rotation::ALL {
            for mirrored in [false, true] {
                let placement = Placement::new(ivec2(1500, -700), rotation, mirrored);
                for p in SAMPLES {
                    assert_eq!(
                        placement.invert(placement.apply(p)),
                        p,
                        "rotation {rotation:?} mirrored {mirrored}"
                    );
                }
            }
        }
    }

    #[test]
    fn mirror_applies_before_rotation() {
        let placement = Placement::new(IVec2::ZERO, Rotation::R90, true);
        // mirror: (3, 1) -> (-3, 1); rotate 90: -> (-1, -3)
        assert_eq!(placement.apply(ivec2(3, 1)), ivec2(-1, -3));
    }

    #[test]
    fn compose_matches_nested_application() {
        for outer_rot in Rotation::ALL {
            for inner_rot in Rotation::ALL {
                for (outer_mirror, inner_mirror) in
                    [(false, false), (false, true), (true, false), (true, true)]
                {
                    let outer = Placement::new(ivec2(400, 100), outer_rot, outer_mirror);
                    let inner = Placement::new(ivec2(-30, 70), inner_rot, inner_mirror);
                    let composed = outer.compose(&inner);
                    for p in SAMPLES {
                        assert_eq!(composed.apply(p), outer.apply(inner.apply(p)));
                    }
                }
            }
        }
    }

    #[test]
    fn float_and_integer_paths_agree() {
        let placement = Placement::new(ivec2(10, 20), Rotation::R270, true);
        for p in SAMPLES {
            assert_eq!(placement.apply_f(p.as_dvec2()), placement.apply(p).as_dvec2());
        }
    }

    #[test]
    fn orient_angle_composes_text_rotation() {
        let plain = Placement::new(IVec2::ZERO, Rotation::R90, false);
        assert_eq!(plain.orient_angle(90), 180);
        let mirrored = Placement::new(IVec2::ZERO, Rotation::R90, true);
        assert_eq!(mirrored.orient_angle(90), 0);
        assert_eq!(Placement::IDENTITY.orient_angle(-90), 270);
    }

    #[test]
    fn post_transform_flips_and_pads() {
        let bounds = SceneBounds::finalize(BoundingBox::from_corners(ivec2(100, 200), ivec2(500, 800)));
        let out = OutputTransform::new(&bounds, 1000);
        assert_eq!(out.to_output(ivec2(100, 800)), ivec2(1000, 1000));
        assert_eq!(out.to_output(ivec2(500, 200)), ivec2(1400, 1600));
        assert_eq!(out.canvas_size(), ivec2(2400, 2600));
        assert_eq!(out.to_output_f(dvec2(100.0, 800.0)), dvec2(1000.0, 1000.0));
    }

    #[test]
    fn empty_scene_bounds_collapse_to_origin() {
        let bounds = SceneBounds::finalize(BoundingBox::new());
        assert_eq!(bounds.bbox().min, IVec2::ZERO);
        let out = OutputTransform::new(&bounds, 10);
        assert_eq!(out.canvas_size(), ivec2(20, 20));
    }

    #[test]
    fn margin_is_clamped() {
        let bounds = SceneBounds::finalize(BoundingBox::from_corners(IVec2::ZERO, ivec2(100, 100)));
        let out = OutputTransform::new(&bounds, i32::MAX);
        assert_eq!(out.canvas_size(), ivec2(100 + 2 * defaults::MAX_MARGIN, 100 + 2 * defaults::MAX_MARGIN));
        assert_eq!(OutputTransform::new(&bounds, -50).canvas_size(), ivec2(100, 100));
    }
}
