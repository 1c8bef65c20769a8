use crate::animatable::KeyframeSeries;
use crate::nodes::{color_from_raw, Propagation};
use crate::property::{AnyNodeProperty, NodeProperty, PropertyKey, PropertyMap};
use crate::provider::{GroupInterpolator, KeyframeInterpolator, SingleValueProvider};
use crate::render::{LineCap, LineJoin, StrokeRender};
use glam::Vec4;
use lottie_data::model::{self as data, DashKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeProperty {
    Opacity,
    Color,
    Width,
    Dashes,
    DashPhase,
}

impl PropertyKey for StrokeProperty {
    const ALL: &'static [Self] = &[
        StrokeProperty::Opacity,
        StrokeProperty::Color,
        StrokeProperty::Width,
        StrokeProperty::Dashes,
        StrokeProperty::DashPhase,
    ];

    fn name(self) -> &'static str {
        match self {
            StrokeProperty::Opacity => "Opacity",
            StrokeProperty::Color => "Color",
            StrokeProperty::Width => "Stroke Width",
            StrokeProperty::Dashes => "Dashes",
            StrokeProperty::DashPhase => "Dash Phase",
        }
    }
}

pub struct StrokeNodeProperties {
    pub opacity: NodeProperty<f32>,
    pub color: NodeProperty<Vec4>,
    pub width: NodeProperty<f32>,
    pub dash_pattern: NodeProperty<Vec<f32>>,
    pub dash_phase: NodeProperty<f32>,

    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
}

impl StrokeNodeProperties {
    pub fn new(stroke: &data::StrokeShape) -> Self {
        let mut lengths = Vec::new();
        let mut phase = None;
        for dash in &stroke.d {
            let series = KeyframeSeries::from_property(&dash.v, |v| *v, 0.0);
            match dash.kind() {
                DashKind::Offset => phase = Some(series),
                DashKind::Dash | DashKind::Gap | DashKind::Length => lengths.push(series),
                DashKind::Unknown => {
                    tracing::debug!(code = ?dash.n, "ignoring dash entry of unknown kind");
                }
            }
        }

        let dash_pattern = if lengths.is_empty() {
            NodeProperty::new(SingleValueProvider::new(Vec::new()))
        } else {
            NodeProperty::new(GroupInterpolator::new(lengths))
        };
        let dash_phase = match phase {
            Some(series) => NodeProperty::new(KeyframeInterpolator::new(series)),
            None => NodeProperty::new(SingleValueProvider::new(0.0)),
        };

        Self {
            opacity: NodeProperty::new(KeyframeInterpolator::from_property(
                &stroke.o,
                |v| *v,
                100.0,
            )),
            color: NodeProperty::new(KeyframeInterpolator::from_property(
                &stroke.c,
                |v| color_from_raw(v),
                Vec4::ONE,
            )),
            width: NodeProperty::new(KeyframeInterpolator::from_property(
                &stroke.w,
                |v| *v,
                1.0,
            )),
            dash_pattern,
            dash_phase,
            line_cap: LineCap::from_code(stroke.lc),
            line_join: LineJoin::from_code(stroke.lj),
            miter_limit: stroke.ml.unwrap_or(4.0),
        }
    }
}

impl PropertyMap for StrokeNodeProperties {
    type Key = StrokeProperty;

    fn property(&self, key: StrokeProperty) -> &dyn AnyNodeProperty {
        match key {
            StrokeProperty::Opacity => &self.opacity,
            StrokeProperty::Color => &self.color,
            StrokeProperty::Width => &self.width,
            StrokeProperty::Dashes => &self.dash_pattern,
            StrokeProperty::DashPhase => &self.dash_phase,
        }
    }

    fn property_mut(&mut self, key: StrokeProperty) -> &mut dyn AnyNodeProperty {
        match key {
            StrokeProperty::Opacity => &mut self.opacity,
            StrokeProperty::Color => &mut self.color,
            StrokeProperty::Width => &mut self.width,
            StrokeProperty::Dashes => &mut self.dash_pattern,
            StrokeProperty::DashPhase => &mut self.dash_phase,
        }
    }
}

/// Node that manages stroking a path
pub struct StrokeNode {
    pub properties: StrokeNodeProperties,
    render: StrokeRender,
}

impl StrokeNode {
    pub const PROPAGATION: Propagation = Propagation::Contained;

    pub fn new(stroke: &data::StrokeShape) -> Self {
        Self {
            properties: StrokeNodeProperties::new(stroke),
            render: StrokeRender::default(),
        }
    }

    pub fn render(&self) -> &StrokeRender {
        &self.render
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.render.enabled = enabled;
    }

    pub fn rebuild_outputs(&mut self) {
        let props = &self.properties;
        let render = &mut self.render;

        render.color = *props.color.value();
        render.opacity = *props.opacity.value() * 0.01;
        render.width = *props.width.value();
        render.miter_limit = props.miter_limit;
        render.cap = props.line_cap;
        render.join = props.line_join;

        let lengths = props.dash_pattern.value();
        if lengths.is_empty() {
            render.dash_lengths = None;
            render.dash_phase = None;
        } else {
            let buffer = render.dash_lengths.get_or_insert_with(Vec::new);
            buffer.clear();
            buffer.extend_from_slice(lengths);
            render.dash_phase = Some(*props.dash_phase.value());
        }
    }
}
