//! Rendering context - state carried through the render walk

use glam::IVec2;

use crate::ast::Attribute;
use crate::config::Config;
use crate::connectivity::Connectivity;
use crate::transform::{OutputTransform, Placement};

use super::types::Primitive;

/// Per-level state, rebuilt on every descent into an instance
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Local to schematic space for the current level
    pub placement: Placement,
    /// Attributes of the instance whose symbol is being drawn
    pub component_attributes: &'a [Attribute],
}

impl<'a> TransformContext<'a> {
    pub fn root() -> Self {
        TransformContext {
            placement: Placement::IDENTITY,
            component_attributes: &[],
        }
    }

    /// Context for the symbol of an instance placed in this context
    pub fn enter(&self, placement: &Placement, attributes: &'a [Attribute]) -> TransformContext<'a> {
        TransformContext {
            placement: self.placement.compose(placement),
            component_attributes: attributes,
        }
    }

    /// True if the enclosing instance supplies its own `key` attribute
    pub fn overrides(&self, key: &str) -> bool {
        self.component_attributes.iter().any(|a| a.key == key)
    }
}

/// Accumulators for one render pass
pub struct RenderContext<'a> {
    pub config: &'a Config,
    pub output: OutputTransform,
    pub primitives: Vec<Primitive>,
    pub connectivity: Connectivity,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a Config, output: OutputTransform) -> Self {
        RenderContext {
            config,
            output,
            primitives: Vec::new(),
            connectivity: Connectivity::new(),
        }
    }

    /// Map a local point all the way to output space
    pub fn point(&self, tctx: &TransformContext<'_>, p: IVec2) -> IVec2 {
        self.output.to_output(tctx.placement.apply(p))
    }

    pub fn add(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }
}
