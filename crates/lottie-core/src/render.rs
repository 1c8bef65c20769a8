//! Drawing parameters produced by animator nodes. The backend reads these
//! after each graph update; it never writes them.

use glam::{Mat3, Vec4};
use kurbo::BezPath;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LineCap::Butt,
            3 => LineCap::Square,
            _ => LineCap::Round,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LineJoin::Miter,
            3 => LineJoin::Bevel,
            _ => LineJoin::Round,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn from_code(code: Option<u8>) -> Self {
        match code {
            Some(2) => FillRule::EvenOdd,
            _ => FillRule::NonZero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeRender {
    pub enabled: bool,
    pub color: Vec4,
    /// 0.0..=1.0
    pub opacity: f32,
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    /// `None` means the stroke is solid; never an empty list.
    pub dash_lengths: Option<Vec<f32>>,
    pub dash_phase: Option<f32>,
}

impl Default for StrokeRender {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Vec4::ONE,
            opacity: 1.0,
            width: 1.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
            miter_limit: 4.0,
            dash_lengths: None,
            dash_phase: None,
        }
    }
}

impl StrokeRender {
    pub fn is_dashed(&self) -> bool {
        self.dash_lengths.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillRender {
    pub enabled: bool,
    pub color: Vec4,
    pub opacity: f32,
    pub rule: FillRule,
}

impl Default for FillRender {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Vec4::ONE,
            opacity: 1.0,
            rule: FillRule::NonZero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRender {
    pub enabled: bool,
    pub local_transform: Mat3,
    /// Parent world transform composed with `local_transform`.
    pub world_transform: Mat3,
    pub opacity: f32,
    pub world_opacity: f32,
}

impl Default for GroupRender {
    fn default() -> Self {
        Self {
            enabled: true,
            local_transform: Mat3::IDENTITY,
            world_transform: Mat3::IDENTITY,
            opacity: 1.0,
            world_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRender {
    pub enabled: bool,
    #[serde(serialize_with = "serialize_svg_path")]
    pub path: BezPath,
    pub closed: bool,
}

impl Default for PathRender {
    fn default() -> Self {
        Self {
            enabled: true,
            path: BezPath::new(),
            closed: false,
        }
    }
}

fn serialize_svg_path<S: Serializer>(path: &BezPath, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_svg())
}

/// Read-only view of whatever a node produces.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderOutput<'a> {
    Group(&'a GroupRender),
    Stroke(&'a StrokeRender),
    Fill(&'a FillRender),
    Path(&'a PathRender),
}

impl<'a> RenderOutput<'a> {
    pub fn is_enabled(&self) -> bool {
        match *self {
            RenderOutput::Group(r) => r.enabled,
            RenderOutput::Stroke(r) => r.enabled,
            RenderOutput::Fill(r) => r.enabled,
            RenderOutput::Path(r) => r.enabled,
        }
    }

    pub fn as_group(&self) -> Option<&'a GroupRender> {
        match *self {
            RenderOutput::Group(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&'a StrokeRender> {
        match *self {
            RenderOutput::Stroke(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_fill(&self) -> Option<&'a FillRender> {
        match *self {
            RenderOutput::Fill(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&'a PathRender> {
        match *self {
            RenderOutput::Path(r) => Some(r),
            _ => None,
        }
    }
}
