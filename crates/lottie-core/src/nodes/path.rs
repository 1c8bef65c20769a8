use crate::nodes::Propagation;
use crate::property::{AnyNodeProperty, NodeProperty, PropertyKey, PropertyMap};
use crate::provider::KeyframeInterpolator;
use crate::render::PathRender;
use kurbo::{BezPath, Point};
use lottie_data::model::{self as data, BezierPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProperty {
    Path,
}

impl PropertyKey for PathProperty {
    const ALL: &'static [Self] = &[PathProperty::Path];

    fn name(self) -> &'static str {
        match self {
            PathProperty::Path => "Path",
        }
    }
}

pub struct PathNodeProperties {
    pub path: NodeProperty<BezierPath>,
}

impl PathNodeProperties {
    pub fn new(shape: &data::PathShape) -> Self {
        Self {
            path: NodeProperty::new(KeyframeInterpolator::from_property(
                &shape.ks,
                BezierPath::clone,
                BezierPath::default(),
            )),
        }
    }
}

impl PropertyMap for PathNodeProperties {
    type Key = PathProperty;

    fn property(&self, key: PathProperty) -> &dyn AnyNodeProperty {
        match key {
            PathProperty::Path => &self.path,
        }
    }

    fn property_mut(&mut self, key: PathProperty) -> &mut dyn AnyNodeProperty {
        match key {
            PathProperty::Path => &mut self.path,
        }
    }
}

pub struct PathNode {
    pub properties: PathNodeProperties,
    render: PathRender,
}

impl PathNode {
    pub const PROPAGATION: Propagation = Propagation::Contained;

    pub fn new(shape: &data::PathShape) -> Self {
        Self {
            properties: PathNodeProperties::new(shape),
            render: PathRender::default(),
        }
    }

    pub fn render(&self) -> &PathRender {
        &self.render
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.render.enabled = enabled;
    }

    pub fn rebuild_outputs(&mut self) {
        let shape = self.properties.path.value();
        self.render.closed = shape.c;
        write_bez_path(shape, &mut self.render.path);
    }
}

fn point(p: [f32; 2]) -> Point {
    Point::new(p[0] as f64, p[1] as f64)
}

fn offset(base: [f32; 2], delta: Option<&[f32; 2]>) -> Point {
    let d = delta.copied().unwrap_or([0.0, 0.0]);
    Point::new((base[0] + d[0]) as f64, (base[1] + d[1]) as f64)
}

/// Convert a shape with tangents relative to their vertex into absolute
/// cubic segments. `out` clears and refills the existing path.
pub fn write_bez_path(shape: &BezierPath, out: &mut BezPath) {
    out.truncate(0);
    let Some(&first) = shape.v.first() else {
        return;
    };

    out.move_to(point(first));
    let count = shape.v.len();
    let segments = if shape.c { count } else { count - 1 };
    for idx in 0..segments {
        let next = (idx + 1) % count;
        let from = shape.v[idx];
        let to = shape.v[next];
        out.curve_to(
            offset(from, shape.o.get(idx)),
            offset(to, shape.i.get(next)),
            point(to),
        );
    }
    if shape.c {
        out.close_path();
    }
}
