use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Top-level animation document. Only the fields the animator graph consumes
/// are modelled; everything else in the file is ignored by serde.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LottieJson {
    #[serde(default)]
    pub v: Option<String>,
    #[serde(default)]
    pub nm: Option<String>,
    pub ip: f32,
    pub op: f32,
    pub fr: f32,
    #[serde(default)]
    pub w: u32,
    #[serde(default)]
    pub h: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Layer {
    #[serde(default)]
    pub ty: u8, // 4 = shape layer
    #[serde(default)]
    pub ind: Option<u32>,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub ip: f32,
    #[serde(default)]
    pub op: f32,
    #[serde(default)]
    pub ks: Transform,
    #[serde(default)]
    pub hd: Option<bool>,
    #[serde(default)]
    pub shapes: Option<Vec<Shape>>,
}

impl Layer {
    pub const SHAPE_LAYER: u8 = 4;

    pub fn is_hidden(&self) -> bool {
        self.hd.unwrap_or(false)
    }
}

// Shapes

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "ty")]
pub enum Shape {
    #[serde(rename = "gr")]
    Group(GroupShape),
    #[serde(rename = "fl")]
    Fill(FillShape),
    #[serde(rename = "st")]
    Stroke(StrokeShape),
    #[serde(rename = "tr")]
    Transform(TransformShape),
    #[serde(rename = "sh")]
    Path(PathShape),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GroupShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub it: Vec<Shape>,
}

impl GroupShape {
    /// The group's own transform item. Lottie stores it as the last `tr`
    /// entry of `it`; the first one found wins here.
    pub fn transform(&self) -> Option<&Transform> {
        self.it.iter().find_map(|shape| match shape {
            Shape::Transform(tr) => Some(&tr.t),
            _ => None,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FillShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub c: Property<Vec<f32>>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default)]
    pub r: Option<u8>, // 1 = non-zero, 2 = even-odd
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StrokeShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub c: Property<Vec<f32>>,
    #[serde(default)]
    pub w: Property<f32>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default)]
    pub lc: u8, // 1 = butt, 2 = round, 3 = square
    #[serde(default)]
    pub lj: u8, // 1 = miter, 2 = round, 3 = bevel
    #[serde(default)]
    pub ml: Option<f32>,
    #[serde(default)]
    pub d: Vec<DashProperty>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DashProperty {
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub nm: Option<String>,
    pub v: Property<f32>,
}

impl DashProperty {
    pub fn kind(&self) -> DashKind {
        DashKind::from_code(self.n.as_deref())
    }
}

/// Role of one entry of a stroke's dash list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashKind {
    Dash,
    Gap,
    Length,
    Offset,
    Unknown,
}

impl DashKind {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("d") => DashKind::Dash,
            Some("g") => DashKind::Gap,
            Some("v") => DashKind::Length,
            Some("o") => DashKind::Offset,
            _ => DashKind::Unknown,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PathShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub ks: Property<BezierPath>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TransformShape {
    #[serde(flatten)]
    pub t: Transform,
}

/// 2D transform. Multi-dimensional values are kept as plain float lists so
/// that both `[x, y]` and `[x, y, z]` forms parse.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Transform {
    #[serde(default)]
    pub a: Property<Vec<f32>>, // Anchor
    #[serde(default)]
    pub p: Property<Vec<f32>>, // Position
    #[serde(default)]
    pub s: Property<Vec<f32>>, // Scale, percent
    #[serde(default, alias = "rz")]
    pub r: Property<f32>, // Rotation, degrees
    #[serde(default)]
    pub o: Property<f32>, // Opacity, percent
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Property<T> {
    #[serde(default)]
    pub a: u8,
    #[serde(default)]
    #[serde(bound(deserialize = "T: DeserializeOwned"))]
    pub k: Value<T>,
    #[serde(default)]
    pub ix: Option<u32>,
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Property {
            a: 0,
            k: Value::Default,
            ix: None,
        }
    }
}

impl<T> Property<T> {
    pub fn fixed(value: T) -> Self {
        Property {
            a: 0,
            k: Value::Static(value),
            ix: None,
        }
    }

    pub fn animated(keyframes: Vec<Keyframe<T>>) -> Self {
        Property {
            a: 1,
            k: Value::Animated(keyframes),
            ix: None,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub enum Value<T> {
    Default,
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;

        if v.is_null() {
            return Ok(Value::Default);
        }

        // Keyframe lists are arrays of objects; try them before static
        // values so `[{"t": 0, ...}]` never parses as a float list.
        let looks_animated = v
            .as_array()
            .and_then(|arr| arr.first())
            .is_some_and(|first| first.get("t").is_some());
        if looks_animated {
            if let Ok(keyframes) = serde_json::from_value::<Vec<Keyframe<T>>>(v.clone()) {
                return Ok(Value::Animated(keyframes));
            }
        }

        if let Ok(val) = serde_json::from_value::<T>(v.clone()) {
            return Ok(Value::Static(val));
        }

        // Scalars are often wrapped as `[10]`
        if let Ok(vec) = serde_json::from_value::<Vec<T>>(v) {
            if let Some(first) = vec.into_iter().next() {
                return Ok(Value::Static(first));
            }
        }

        Ok(Value::Default)
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Default
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Keyframe<T> {
    pub t: f32,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    pub s: Option<T>,
    /// Legacy end value; newer files take the next keyframe's `s` instead.
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    pub e: Option<T>,
    #[serde(default)]
    pub i: Option<BezierTangent>,
    #[serde(default)]
    pub o: Option<BezierTangent>,
    #[serde(default)]
    pub to: Option<Vec<f32>>,
    #[serde(default)]
    pub ti: Option<Vec<f32>>,
    #[serde(default)]
    pub h: Option<u8>,
}

impl<T> Keyframe<T> {
    pub fn new(t: f32, s: T) -> Self {
        Keyframe {
            t,
            s: Some(s),
            e: None,
            i: None,
            o: None,
            to: None,
            ti: None,
            h: None,
        }
    }

    pub fn hold(mut self) -> Self {
        self.h = Some(1);
        self
    }

    /// Attach easing handles: `out` leaves this keyframe, `inn` enters it.
    pub fn eased(mut self, out: [f32; 2], inn: [f32; 2]) -> Self {
        self.o = Some(BezierTangent::single(out));
        self.i = Some(BezierTangent::single(inn));
        self
    }

    pub fn is_hold(&self) -> bool {
        self.h == Some(1)
    }
}

fn deserialize_keyframe_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    if v.is_null() {
        return Ok(None);
    }

    if let Ok(val) = serde_json::from_value(v.clone()) {
        return Ok(Some(val));
    }

    if let Ok(vec) = serde_json::from_value::<Vec<T>>(v) {
        if let Some(first) = vec.into_iter().next() {
            return Ok(Some(first));
        }
    }

    Ok(None)
}

pub type Vec2 = [f32; 2];

/// Easing handle of a keyframe, e.g. `{"x": [0.48], "y": [1]}`. Multi-axis
/// properties may carry one entry per axis; only the first is used.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BezierTangent {
    #[serde(deserialize_with = "deserialize_handle_axis")]
    pub x: Vec<f32>,
    #[serde(deserialize_with = "deserialize_handle_axis")]
    pub y: Vec<f32>,
}

impl BezierTangent {
    pub fn single(point: [f32; 2]) -> Self {
        BezierTangent {
            x: vec![point[0]],
            y: vec![point[1]],
        }
    }
}

fn deserialize_handle_axis<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Axis {
        One(f32),
        Many(Vec<f32>),
    }

    Ok(match Axis::deserialize(deserializer)? {
        Axis::One(v) => vec![v],
        Axis::Many(v) => v,
    })
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    #[serde(default)]
    pub i: Vec<Vec2>,
    #[serde(default)]
    pub o: Vec<Vec2>,
    #[serde(default)]
    pub v: Vec<Vec2>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Marker {
    #[serde(default)]
    pub cm: Option<String>,
    #[serde(default)]
    pub tm: Option<f32>,
    #[serde(default)]
    pub dr: Option<f32>,
}
