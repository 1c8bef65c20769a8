use crate::nodes::{color_from_raw, Propagation};
use crate::property::{AnyNodeProperty, NodeProperty, PropertyKey, PropertyMap};
use crate::provider::KeyframeInterpolator;
use crate::render::{FillRender, FillRule};
use glam::Vec4;
use lottie_data::model as data;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillProperty {
    Opacity,
    Color,
}

impl PropertyKey for FillProperty {
    const ALL: &'static [Self] = &[FillProperty::Opacity, FillProperty::Color];

    fn name(self) -> &'static str {
        match self {
            FillProperty::Opacity => "Opacity",
            FillProperty::Color => "Color",
        }
    }
}

pub struct FillNodeProperties {
    pub opacity: NodeProperty<f32>,
    pub color: NodeProperty<Vec4>,
    pub rule: FillRule,
}

impl FillNodeProperties {
    pub fn new(fill: &data::FillShape) -> Self {
        Self {
            opacity: NodeProperty::new(KeyframeInterpolator::from_property(&fill.o, |v| *v, 100.0)),
            color: NodeProperty::new(KeyframeInterpolator::from_property(
                &fill.c,
                |v| color_from_raw(v),
                Vec4::ONE,
            )),
            rule: FillRule::from_code(fill.r),
        }
    }
}

impl PropertyMap for FillNodeProperties {
    type Key = FillProperty;

    fn property(&self, key: FillProperty) -> &dyn AnyNodeProperty {
        match key {
            FillProperty::Opacity => &self.opacity,
            FillProperty::Color => &self.color,
        }
    }

    fn property_mut(&mut self, key: FillProperty) -> &mut dyn AnyNodeProperty {
        match key {
            FillProperty::Opacity => &mut self.opacity,
            FillProperty::Color => &mut self.color,
        }
    }
}

pub struct FillNode {
    pub properties: FillNodeProperties,
    render: FillRender,
}

impl FillNode {
    pub const PROPAGATION: Propagation = Propagation::Contained;

    pub fn new(fill: &data::FillShape) -> Self {
        Self {
            properties: FillNodeProperties::new(fill),
            render: FillRender::default(),
        }
    }

    pub fn render(&self) -> &FillRender {
        &self.render
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.render.enabled = enabled;
    }

    pub fn rebuild_outputs(&mut self) {
        self.render.color = *self.properties.color.value();
        self.render.opacity = *self.properties.opacity.value() * 0.01;
        self.render.rule = self.properties.rule;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::Property;

    #[test]
    fn test_fill_scales_opacity_and_keeps_rule() {
        let mut node = FillNode::new(&data::FillShape {
            c: Property::fixed(vec![0.0, 0.5, 1.0, 0.25]),
            o: Property::fixed(80.0),
            r: Some(2),
            ..Default::default()
        });
        node.properties.update_properties(0.0);
        node.rebuild_outputs();

        assert_eq!(node.render().color, Vec4::new(0.0, 0.5, 1.0, 0.25));
        assert!((node.render().opacity - 0.8).abs() < 1e-6);
        assert_eq!(node.render().rule, FillRule::EvenOdd);
    }

    #[test]
    fn test_missing_opacity_is_fully_opaque() {
        let mut node = FillNode::new(&data::FillShape::default());
        node.properties.update_properties(0.0);
        node.rebuild_outputs();
        assert_eq!(node.render().opacity, 1.0);
        assert_eq!(node.render().color, Vec4::ONE);
    }
}
