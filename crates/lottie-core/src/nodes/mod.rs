//! Concrete animator node kinds. Each kind owns its property map and the
//! render output it rebuilds from it.

pub mod fill;
pub mod group;
pub mod path;
pub mod stroke;

pub use fill::{FillNode, FillProperty};
pub use group::{GroupNode, GroupProperty};
pub use path::{PathNode, PathProperty};
pub use stroke::{StrokeNode, StrokeProperty};

use crate::property::{AnyNodeProperty, PropertyMap};
use crate::render::RenderOutput;
use glam::{Mat3, Vec2, Vec4};

/// How an upstream change affects a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Propagation {
    /// Output depends on inherited context: rebuild whenever upstream changed.
    PermeateDownstream,
    /// Output depends only on own properties: upstream changes are recorded
    /// but do not force a rebuild.
    Contained,
}

/// What a group hands to its descendants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentContext {
    pub transform: Mat3,
    pub opacity: f32,
}

impl Default for ParentContext {
    fn default() -> Self {
        Self {
            transform: Mat3::IDENTITY,
            opacity: 1.0,
        }
    }
}

/// Colors arrive as `[r, g, b]` or `[r, g, b, a]` in 0..1.
pub(crate) fn color_from_raw(raw: &[f32]) -> Vec4 {
    let channel = |idx: usize, fallback: f32| raw.get(idx).copied().unwrap_or(fallback);
    Vec4::new(channel(0, 0.0), channel(1, 0.0), channel(2, 0.0), channel(3, 1.0))
}

pub(crate) fn vec2_from_raw(raw: &[f32], fallback: f32) -> Vec2 {
    let x = raw.first().copied().unwrap_or(fallback);
    let y = raw.get(1).copied().unwrap_or(x);
    Vec2::new(x, y)
}

pub enum NodeKind {
    Group(GroupNode),
    Stroke(StrokeNode),
    Fill(FillNode),
    Path(PathNode),
}

impl NodeKind {
    pub fn propagation(&self) -> Propagation {
        match self {
            NodeKind::Group(_) => GroupNode::PROPAGATION,
            NodeKind::Stroke(_) => StrokeNode::PROPAGATION,
            NodeKind::Fill(_) => FillNode::PROPAGATION,
            NodeKind::Path(_) => PathNode::PROPAGATION,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Group(_) => "group",
            NodeKind::Stroke(_) => "stroke",
            NodeKind::Fill(_) => "fill",
            NodeKind::Path(_) => "path",
        }
    }

    pub fn needs_local_update(&self, frame: f32) -> bool {
        match self {
            NodeKind::Group(n) => n.properties.needs_local_update(frame),
            NodeKind::Stroke(n) => n.properties.needs_local_update(frame),
            NodeKind::Fill(n) => n.properties.needs_local_update(frame),
            NodeKind::Path(n) => n.properties.needs_local_update(frame),
        }
    }

    pub fn update_properties(&mut self, frame: f32) {
        match self {
            NodeKind::Group(n) => n.properties.update_properties(frame),
            NodeKind::Stroke(n) => n.properties.update_properties(frame),
            NodeKind::Fill(n) => n.properties.update_properties(frame),
            NodeKind::Path(n) => n.properties.update_properties(frame),
        }
    }

    pub fn rebuild_outputs(&mut self, parent: &ParentContext) {
        match self {
            NodeKind::Group(n) => n.rebuild_outputs(parent),
            NodeKind::Stroke(n) => n.rebuild_outputs(),
            NodeKind::Fill(n) => n.rebuild_outputs(),
            NodeKind::Path(n) => n.rebuild_outputs(),
        }
    }

    pub(crate) fn set_render_enabled(&mut self, enabled: bool) {
        match self {
            NodeKind::Group(n) => n.set_enabled(enabled),
            NodeKind::Stroke(n) => n.set_enabled(enabled),
            NodeKind::Fill(n) => n.set_enabled(enabled),
            NodeKind::Path(n) => n.set_enabled(enabled),
        }
    }

    pub fn render_output(&self) -> RenderOutput<'_> {
        match self {
            NodeKind::Group(n) => RenderOutput::Group(n.render()),
            NodeKind::Stroke(n) => RenderOutput::Stroke(n.render()),
            NodeKind::Fill(n) => RenderOutput::Fill(n.render()),
            NodeKind::Path(n) => RenderOutput::Path(n.render()),
        }
    }

    pub fn keypath_property(&self, name: &str) -> Option<&dyn AnyNodeProperty> {
        match self {
            NodeKind::Group(n) => n.properties.keypath_property(name),
            NodeKind::Stroke(n) => n.properties.keypath_property(name),
            NodeKind::Fill(n) => n.properties.keypath_property(name),
            NodeKind::Path(n) => n.properties.keypath_property(name),
        }
    }

    pub fn keypath_property_mut(&mut self, name: &str) -> Option<&mut dyn AnyNodeProperty> {
        match self {
            NodeKind::Group(n) => n.properties.keypath_property_mut(name),
            NodeKind::Stroke(n) => n.properties.keypath_property_mut(name),
            NodeKind::Fill(n) => n.properties.keypath_property_mut(name),
            NodeKind::Path(n) => n.properties.keypath_property_mut(name),
        }
    }

    pub fn property_names(&self) -> Vec<&'static str> {
        match self {
            NodeKind::Group(n) => n.properties.property_names(),
            NodeKind::Stroke(n) => n.properties.property_names(),
            NodeKind::Fill(n) => n.properties.property_names(),
            NodeKind::Path(n) => n.properties.property_names(),
        }
    }

    /// Context this node passes to its children, if it is a group.
    pub fn group_context(&self) -> Option<ParentContext> {
        match self {
            NodeKind::Group(n) => Some(n.context()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_color_gets_opaque_alpha() {
        assert_eq!(color_from_raw(&[0.2, 0.4, 0.6]), Vec4::new(0.2, 0.4, 0.6, 1.0));
        assert_eq!(color_from_raw(&[]), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_vec2_accepts_three_components_and_scalars() {
        assert_eq!(vec2_from_raw(&[1.0, 2.0, 3.0], 0.0), Vec2::new(1.0, 2.0));
        assert_eq!(vec2_from_raw(&[50.0], 100.0), Vec2::splat(50.0));
        assert_eq!(vec2_from_raw(&[], 100.0), Vec2::splat(100.0));
    }
}
