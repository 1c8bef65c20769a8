use crate::nodes::{vec2_from_raw, ParentContext, Propagation};
use crate::property::{AnyNodeProperty, NodeProperty, PropertyKey, PropertyMap};
use crate::provider::KeyframeInterpolator;
use crate::render::GroupRender;
use glam::{Mat3, Vec2};
use lottie_data::model as data;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupProperty {
    AnchorPoint,
    Position,
    Scale,
    Rotation,
    Opacity,
}

impl PropertyKey for GroupProperty {
    const ALL: &'static [Self] = &[
        GroupProperty::AnchorPoint,
        GroupProperty::Position,
        GroupProperty::Scale,
        GroupProperty::Rotation,
        GroupProperty::Opacity,
    ];

    fn name(self) -> &'static str {
        match self {
            GroupProperty::AnchorPoint => "Anchor Point",
            GroupProperty::Position => "Position",
            GroupProperty::Scale => "Scale",
            GroupProperty::Rotation => "Rotation",
            GroupProperty::Opacity => "Opacity",
        }
    }
}

pub struct GroupNodeProperties {
    pub anchor: NodeProperty<Vec2>,
    pub position: NodeProperty<Vec2>,
    /// Percent, 100 = unscaled.
    pub scale: NodeProperty<Vec2>,
    /// Degrees.
    pub rotation: NodeProperty<f32>,
    /// Percent.
    pub opacity: NodeProperty<f32>,
}

impl GroupNodeProperties {
    pub fn new(transform: Option<&data::Transform>) -> Self {
        let fallback = data::Transform::default();
        let tr = transform.unwrap_or(&fallback);
        Self {
            anchor: NodeProperty::new(KeyframeInterpolator::from_property(
                &tr.a,
                |v| vec2_from_raw(v, 0.0),
                Vec2::ZERO,
            )),
            position: NodeProperty::new(KeyframeInterpolator::from_property(
                &tr.p,
                |v| vec2_from_raw(v, 0.0),
                Vec2::ZERO,
            )),
            scale: NodeProperty::new(KeyframeInterpolator::from_property(
                &tr.s,
                |v| vec2_from_raw(v, 100.0),
                Vec2::splat(100.0),
            )),
            rotation: NodeProperty::new(KeyframeInterpolator::from_property(&tr.r, |v| *v, 0.0)),
            opacity: NodeProperty::new(KeyframeInterpolator::from_property(&tr.o, |v| *v, 100.0)),
        }
    }
}

impl PropertyMap for GroupNodeProperties {
    type Key = GroupProperty;

    fn property(&self, key: GroupProperty) -> &dyn AnyNodeProperty {
        match key {
            GroupProperty::AnchorPoint => &self.anchor,
            GroupProperty::Position => &self.position,
            GroupProperty::Scale => &self.scale,
            GroupProperty::Rotation => &self.rotation,
            GroupProperty::Opacity => &self.opacity,
        }
    }

    fn property_mut(&mut self, key: GroupProperty) -> &mut dyn AnyNodeProperty {
        match key {
            GroupProperty::AnchorPoint => &mut self.anchor,
            GroupProperty::Position => &mut self.position,
            GroupProperty::Scale => &mut self.scale,
            GroupProperty::Rotation => &mut self.rotation,
            GroupProperty::Opacity => &mut self.opacity,
        }
    }
}

/// A layer or shape group. Its outputs feed every descendant, so changes
/// upstream of it always force a rebuild.
pub struct GroupNode {
    pub properties: GroupNodeProperties,
    render: GroupRender,
}

impl GroupNode {
    pub const PROPAGATION: Propagation = Propagation::PermeateDownstream;

    pub fn new(transform: Option<&data::Transform>) -> Self {
        Self {
            properties: GroupNodeProperties::new(transform),
            render: GroupRender::default(),
        }
    }

    pub fn render(&self) -> &GroupRender {
        &self.render
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.render.enabled = enabled;
    }

    /// Context handed to descendants.
    pub fn context(&self) -> ParentContext {
        ParentContext {
            transform: self.render.world_transform,
            opacity: self.render.world_opacity,
        }
    }

    pub fn rebuild_outputs(&mut self, parent: &ParentContext) {
        let props = &self.properties;
        let anchor = *props.anchor.value();
        let position = *props.position.value();
        let scale = *props.scale.value() * 0.01;
        let rotation = props.rotation.value().to_radians();

        let local = Mat3::from_translation(position)
            * Mat3::from_angle(rotation)
            * Mat3::from_scale(scale)
            * Mat3::from_translation(-anchor);

        let render = &mut self.render;
        render.local_transform = local;
        render.world_transform = parent.transform * local;
        render.opacity = *props.opacity.value() * 0.01;
        render.world_opacity = parent.opacity * render.opacity;
    }
}
