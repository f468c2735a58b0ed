//! Render pass: resolved tree to output-space [`Scene`]
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes and settings
//! - `svg`: the `SvgElement` emitter trait and SVG serialization
//! - `types`: output primitives, markers and the `Scene`
//! - `context`: per-level `TransformContext` and the pass-wide `RenderContext`
//! - `geometry`: arc, box and path mapping
//! - `text`: text substitution and layout
//!
//! The walk needs final scene bounds, which only exist on a
//! [`ResolvedSchematic`], so no output coordinate is ever computed against
//! partial bounds. Connectivity is accumulated during the walk and
//! reconciled once the walk is over.

pub mod defaults;
pub mod svg;
pub mod types;
pub mod context;
pub mod geometry;
pub mod text;

pub use context::{RenderContext, TransformContext};
pub use svg::generate_svg;
pub use types::*;

use crate::ast::{Attribute, Object, PinKind, TextHeader};
use crate::config::Config;
use crate::connectivity::EndpointClass;
use crate::resolve::{ResolvedObject, ResolvedSchematic};
use crate::transform::OutputTransform;

/// Lay out every object of a resolved schematic
pub fn render(resolved: &ResolvedSchematic, config: &Config) -> Scene {
    let output = OutputTransform::new(&resolved.bounds, config.margin);
    let mut ctx = RenderContext::new(config, output);

    render_objects(&mut ctx, &resolved.objects, &TransformContext::root());

    let RenderContext {
        primitives,
        connectivity,
        ..
    } = ctx;
    let endpoints = connectivity.reconcile();
    let markers: Vec<Marker> = endpoints
        .iter()
        .filter_map(|endpoint| {
            let kind = match endpoint.class() {
                EndpointClass::Junction => MarkerKind::Junction,
                EndpointClass::Dangling => MarkerKind::Dangling,
                EndpointClass::Ordinary => return None,
            };
            Some(Marker {
                kind,
                point: endpoint.point,
            })
        })
        .collect();

    crate::log::debug!(
        primitives = primitives.len(),
        endpoints = endpoints.len(),
        markers = markers.len(),
        "rendered scene"
    );

    let size = output.canvas_size();
    Scene {
        width: size.x,
        height: size.y,
        primitives,
        markers,
        diagnostics: resolved.diagnostics.clone(),
    }
}

fn render_objects(ctx: &mut RenderContext<'_>, objects: &[ResolvedObject], tctx: &TransformContext<'_>) {
    for object in objects {
        match object {
            ResolvedObject::Primitive(record) => {
                render_object(ctx, &record.object, tctx);
                render_attributes(ctx, &record.attributes, tctx);
            }
            ResolvedObject::Instance(instance) => {
                // an instance without a symbol draws nothing, attributes included
                let Some(symbol) = &instance.symbol else {
                    continue;
                };
                let inner = tctx.enter(&instance.placement, &instance.attributes);
                render_objects(ctx, &symbol.objects, &inner);
                // instance attributes belong to the frame the instance sits in
                render_attributes(ctx, &instance.attributes, tctx);
            }
        }
    }
}

fn render_object(ctx: &mut RenderContext<'_>, object: &Object, tctx: &TransformContext<'_>) {
    let config = ctx.config;
    match object {
        Object::Line(line) => {
            let shape = LineShape {
                from: ctx.point(tctx, line.from),
                to: ctx.point(tctx, line.to),
                color: line.color,
                width: config.stroke(line.width),
                kind: LineKind::Graphic,
            };
            ctx.add(shape);
        }
        Object::Net(net) => {
            let from = ctx.point(tctx, net.from);
            let to = ctx.point(tctx, net.to);
            ctx.add(LineShape {
                from,
                to,
                color: net.color,
                width: config.min_thickness,
                kind: LineKind::Net,
            });
            ctx.connectivity.add_segment(from, to);
        }
        Object::Bus(bus) => {
            let shape = LineShape {
                from: ctx.point(tctx, bus.from),
                to: ctx.point(tctx, bus.to),
                color: bus.color,
                width: config.bus_thickness,
                kind: LineKind::Bus,
            };
            ctx.add(shape);
        }
        Object::Pin(pin) => {
            let width = match pin.kind {
                PinKind::Normal => config.min_thickness,
                PinKind::Bus => config.bus_thickness,
            };
            let shape = LineShape {
                from: ctx.point(tctx, pin.from),
                to: ctx.point(tctx, pin.to),
                color: pin.color,
                width,
                kind: LineKind::Pin,
            };
            ctx.add(shape);
            let end = ctx.point(tctx, pin.connection_point());
            ctx.connectivity.touch(end);
        }
        Object::Box(b) => {
            let rect = geometry::box_rect(b, &tctx.placement, &ctx.output, config.stroke(b.width));
            ctx.add(rect);
        }
        Object::Circle(circle) => {
            let shape = CircleShape {
                center: ctx.point(tctx, circle.center),
                radius: circle.radius,
                color: circle.color,
                width: config.stroke(circle.width),
                filled: circle.filled,
            };
            ctx.add(shape);
        }
        Object::Arc(arc) => {
            let shape = geometry::arc_primitive(arc, &tctx.placement, &ctx.output, config.stroke(arc.width));
            ctx.add(shape);
        }
        Object::Path(path) => {
            let shape = PathShape {
                commands: geometry::path_commands(&path.commands, &tctx.placement, &ctx.output),
                color: path.color,
                width: config.stroke(path.width),
                filled: path.filled,
            };
            ctx.add(shape);
        }
        Object::Text(text) => {
            if !text.header.visible {
                return;
            }
            if let Some(name) = text.attribute_name() {
                if tctx.overrides(name) {
                    crate::log::debug!(attribute = name, "symbol text overridden by component");
                    return;
                }
            }
            let shown = text::display_text(&text.lines.join("\n"), text.header.show);
            render_text(ctx, tctx, &text.header, &shown);
        }
        // components were turned into instances during resolution
        Object::Component(_) | Object::Other(_) => {}
    }
}

fn render_attributes(ctx: &mut RenderContext<'_>, attributes: &[Attribute], tctx: &TransformContext<'_>) {
    for attribute in attributes.iter().filter(|a| a.header.visible) {
        let shown = text::display_attribute(&attribute.key, &attribute.value, attribute.header.show);
        render_text(ctx, tctx, &attribute.header, &shown);
    }
}

/// Emit one text primitive per line of `content`
fn render_text(ctx: &mut RenderContext<'_>, tctx: &TransformContext<'_>, header: &TextHeader, content: &str) {
    let angle = tctx.placement.orient_angle(header.angle);
    let layout = text::layout(header.alignment, angle, tctx.placement.mirrored);
    let font_size = text::font_size(header.size);
    let first = ctx.point(tctx, header.origin).as_dvec2();

    let lines: Vec<&str> = content.split('\n').collect();
    let origins = text::line_origins(first, lines.len(), layout.rotation, font_size, ctx.config.line_spacing);
    for (line, position) in lines.into_iter().zip(origins) {
        ctx.add(TextShape {
            position,
            spans: text::overline_spans(line),
            color: header.color,
            font_size,
            anchor: layout.anchor,
            baseline: layout.baseline,
            rotation: layout.rotation,
        });
    }
}
