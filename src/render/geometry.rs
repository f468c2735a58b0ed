//! Shape geometry that needs more than mapping a few points

use glam::{DVec2, IVec2, dvec2};

use crate::ast::{Arc, BoxObject, PathCommand};
use crate::transform::{OutputTransform, Placement};

use super::types::{ArcShape, CircleShape, Primitive, RectShape};

/// Point at `angle` degrees (counter-clockwise from +x) on a circle
pub fn polar(center: IVec2, radius: i32, angle: f64) -> DVec2 {
    let theta = angle.to_radians();
    center.as_dvec2() + f64::from(radius) * dvec2(theta.cos(), theta.sin())
}

/// Map an arc into output space.
///
/// The sweep is counter-clockwise in schematic space; the Y flip turns that
/// clockwise on screen, and a mirrored frame turns it back. A sweep of a
/// full turn or more is drawn as a hollow circle.
pub fn arc_primitive(arc: &Arc, placement: &Placement, output: &OutputTransform, width: i32) -> Primitive {
    if arc.sweep_angle.abs() >= 360 {
        return CircleShape {
            center: output.to_output(placement.apply(arc.center)),
            radius: arc.radius,
            color: arc.color,
            width,
            filled: false,
        }
        .into();
    }

    let start = f64::from(arc.start_angle);
    let end = start + f64::from(arc.sweep_angle);
    let map = |p: DVec2| output.to_output_f(placement.apply_f(p));
    ArcShape {
        start: map(polar(arc.center, arc.radius, start)),
        end: map(polar(arc.center, arc.radius, end)),
        radius: arc.radius,
        large_arc: arc.sweep_angle.abs() > 180,
        sweep: (arc.sweep_angle > 0) ^ placement.mirrored,
        color: arc.color,
        width,
    }
    .into()
}

/// Map a box by its two opposite corners and rebuild it axis-aligned
pub fn box_rect(b: &BoxObject, placement: &Placement, output: &OutputTransform, width: i32) -> RectShape {
    let a = output.to_output(placement.apply(b.corner));
    let c = output.to_output(placement.apply(b.corner + b.size));
    let min = a.min(c);
    let max = a.max(c);
    RectShape {
        origin: min,
        size: max - min,
        color: b.color,
        width,
        filled: b.filled,
    }
}

/// Map every point of a path
pub fn path_commands(commands: &[PathCommand], placement: &Placement, output: &OutputTransform) -> Vec<PathCommand> {
    let map = |p: IVec2| output.to_output(placement.apply(p));
    commands
        .iter()
        .map(|command| match *command {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
            PathCommand::CurveTo(c1, c2, p) => PathCommand::CurveTo(map(c1), map(c2), map(p)),
            PathCommand::Close => PathCommand::Close,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Rotation, SceneBounds};
    use crate::types::{BoundingBox, ColorIndex};
    use glam::ivec2;

    fn output() -> OutputTransform {
        // schematic (0,0)..(1000,1000) with no margin: output y = 1000 - y
        let bounds = SceneBounds::finalize(BoundingBox::from_corners(ivec2(0, 0), ivec2(1000, 1000)));
        OutputTransform::new(&bounds, 0)
    }

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    fn arc(start: i32, sweep: i32) -> Arc {
        Arc {
            center: ivec2(500, 500),
            radius: 100,
            start_angle: start,
            sweep_angle: sweep,
            color: ColorIndex(3),
            width: 0,
        }
    }

    #[test]
    fn quarter_arc_endpoints_and_flags() {
        let Primitive::Arc(shape) = arc_primitive(&arc(0, 90), &Placement::IDENTITY, &output(), 3) else {
            panic!("expected an arc");
        };
        assert!(close(shape.start, dvec2(600.0, 500.0)));
        assert!(close(shape.end, dvec2(500.0, 400.0)));
        assert!(!shape.large_arc);
        assert!(shape.sweep);
    }

    #[test]
    fn mirroring_reverses_the_sweep() {
        let mirrored = Placement::new(ivec2(1000, 0), Rotation::R0, true);
        let Primitive::Arc(shape) = arc_primitive(&arc(0, 270), &mirrored, &output(), 3) else {
            panic!("expected an arc");
        };
        assert!(shape.large_arc);
        assert!(!shape.sweep);
    }

    #[test]
    fn full_turn_becomes_a_circle() {
        let primitive = arc_primitive(&arc(0, 360), &Placement::IDENTITY, &output(), 3);
        assert_eq!(
            primitive,
            Primitive::Circle(CircleShape {
                center: ivec2(500, 500),
                radius: 100,
                color: ColorIndex(3),
                width: 3,
                filled: false,
            })
        );
    }

    #[test]
    fn rotated_box_stays_axis_aligned() {
        let b = BoxObject {
            corner: ivec2(0, 0),
            size: ivec2(200, 100),
            color: ColorIndex(3),
            width: 0,
            filled: false,
        };
        let placement = Placement::new(ivec2(500, 500), Rotation::R90, false);
        let rect = box_rect(&b, &placement, &output(), 3);
        // rotated it spans x 400..500, y 500..700 in schematic space
        assert_eq!(rect.origin, ivec2(400, 300));
        assert_eq!(rect.size, ivec2(100, 200));
    }
}
