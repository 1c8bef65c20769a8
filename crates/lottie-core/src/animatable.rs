use glam::{Vec2, Vec3, Vec4};
use lottie_data::model::{self as data, BezierPath, Property, Value};

/// Spatial tangents of a vector keyframe, relative to the segment endpoints.
/// `out` leaves the start value, `inn` enters the end value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTangents {
    pub out: Vec3,
    pub inn: Vec3,
}

impl SpatialTangents {
    fn from_raw(out: Option<&Vec<f32>>, inn: Option<&Vec<f32>>) -> Option<Self> {
        let out = out.map(|v| raw_to_vec3(v)).unwrap_or(Vec3::ZERO);
        let inn = inn.map(|v| raw_to_vec3(v)).unwrap_or(Vec3::ZERO);
        if out == Vec3::ZERO && inn == Vec3::ZERO {
            // Zero tangents describe a straight line; plain lerp is identical
            return None;
        }
        Some(Self { out, inn })
    }
}

fn raw_to_vec3(v: &[f32]) -> Vec3 {
    Vec3::new(
        v.first().copied().unwrap_or(0.0),
        v.get(1).copied().unwrap_or(0.0),
        v.get(2).copied().unwrap_or(0.0),
    )
}

pub trait Interpolatable: Sized + Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;

    fn lerp_spatial(&self, other: &Self, t: f32, _tangents: Option<&SpatialTangents>) -> Self {
        self.lerp(other, t)
    }
}

impl Interpolatable for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

fn cubic_point<V>(p0: V, p1: V, p2: V, p3: V, t: f32) -> V
where
    V: std::ops::Mul<f32, Output = V> + std::ops::Add<Output = V>,
{
    let one_minus_t = 1.0 - t;
    let one_minus_t_sq = one_minus_t * one_minus_t;
    let t_sq = t * t;

    p0 * (one_minus_t_sq * one_minus_t)
        + p1 * (3.0 * one_minus_t_sq * t)
        + p2 * (3.0 * one_minus_t * t_sq)
        + p3 * (t_sq * t)
}

impl Interpolatable for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::lerp(*self, *other, t)
    }

    fn lerp_spatial(&self, other: &Self, t: f32, tangents: Option<&SpatialTangents>) -> Self {
        let Some(tan) = tangents else {
            return self.lerp(other, t);
        };
        let p0 = *self;
        let p3 = *other;
        cubic_point(p0, p0 + tan.out.truncate(), p3 + tan.inn.truncate(), p3, t)
    }
}

impl Interpolatable for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec3::lerp(*self, *other, t)
    }

    fn lerp_spatial(&self, other: &Self, t: f32, tangents: Option<&SpatialTangents>) -> Self {
        let Some(tan) = tangents else {
            return self.lerp(other, t);
        };
        let p0 = *self;
        let p3 = *other;
        cubic_point(p0, p0 + tan.out, p3 + tan.inn, p3, t)
    }
}

impl Interpolatable for Vec4 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec4::lerp(*self, *other, t)
    }
}

impl Interpolatable for Vec<f32> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| a + (b - a) * t)
            .collect()
    }
}

impl Interpolatable for BezierPath {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t <= 0.0 {
            return self.clone();
        }
        if t >= 1.0 {
            return other.clone();
        }

        // Shapes with differing vertex counts morph over the common prefix
        let count = self.v.len().min(other.v.len());
        if count == 0 {
            return self.clone();
        }

        let mix = |a: data::Vec2, b: data::Vec2| [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t];
        let tangent = |side: &[data::Vec2], idx: usize| side.get(idx).copied().unwrap_or([0.0, 0.0]);

        let mut path = BezierPath {
            c: self.c,
            v: Vec::with_capacity(count),
            i: Vec::with_capacity(count),
            o: Vec::with_capacity(count),
        };
        for idx in 0..count {
            path.v.push(mix(self.v[idx], other.v[idx]));
            path.i.push(mix(tangent(&self.i, idx), tangent(&other.i, idx)));
            path.o.push(mix(tangent(&self.o, idx), tangent(&other.o, idx)));
        }
        path
    }
}

/// How progress is remapped across the span that starts at a keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Keep the start value until the next keyframe, then jump.
    Hold,
    Linear,
    /// Timing curve through `(0,0) out inn (1,1)`.
    CubicBezier { out: Vec2, inn: Vec2 },
}

impl Easing {
    pub fn ease(&self, t: f32) -> f32 {
        match self {
            Easing::Hold => 0.0,
            Easing::Linear => t,
            Easing::CubicBezier { out, inn } => solve_cubic_bezier(*out, *inn, t),
        }
    }
}

// Cubic Bezier Easing
pub fn solve_cubic_bezier(p1: Vec2, p2: Vec2, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let bezier_x = |t: f32| {
        let one_minus_t = 1.0 - t;
        3.0 * one_minus_t * one_minus_t * t * p1.x + 3.0 * one_minus_t * t * t * p2.x + t * t * t
    };

    // Newton-Raphson
    let mut t = x;
    let mut converged = false;
    for _ in 0..8 {
        let err = bezier_x(t) - x;
        if err.abs() < 1e-4 {
            converged = true;
            break;
        }

        let one_minus_t = 1.0 - t;
        let dx_dt = 3.0 * one_minus_t * one_minus_t * p1.x
            + 6.0 * one_minus_t * t * (p2.x - p1.x)
            + 3.0 * t * t * (1.0 - p2.x);

        if dx_dt.abs() < 1e-6 {
            break;
        }
        t -= err / dx_dt;
    }

    // Flat derivatives stall Newton; bisection always converges on [0, 1]
    if !converged || !(0.0..=1.0).contains(&t) {
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let est = bezier_x(t);
            if (est - x).abs() < 1e-5 {
                break;
            }
            if est < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
    }

    let one_minus_t = 1.0 - t;
    3.0 * one_minus_t * one_minus_t * t * p1.y + 3.0 * one_minus_t * t * t * p2.y + t * t * t
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
    pub easing: Easing,
    pub spatial_tangents: Option<SpatialTangents>,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self {
            time,
            value,
            easing: Easing::Linear,
            spatial_tangents: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn hold(self) -> Self {
        self.with_easing(Easing::Hold)
    }

    pub fn with_tangents(mut self, out: Vec3, inn: Vec3) -> Self {
        self.spatial_tangents = Some(SpatialTangents { out, inn });
        self
    }
}

/// Where a frame falls relative to a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Before,
    /// Between keyframe `i` (inclusive) and `i + 1` (exclusive).
    Span(usize),
    After,
}

/// Keyframes of one property, sorted strictly increasing by time and never
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSeries<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolatable> KeyframeSeries<T> {
    /// Returns `None` for an empty list. Keyframes are sorted by time and
    /// later entries sharing a timestamp are dropped.
    pub fn new(mut keyframes: Vec<Keyframe<T>>) -> Option<Self> {
        if keyframes.is_empty() {
            return None;
        }
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        keyframes.dedup_by(|later, earlier| later.time == earlier.time);
        Some(Self { keyframes })
    }

    pub fn constant(value: T) -> Self {
        Self {
            keyframes: vec![Keyframe::new(0.0, value)],
        }
    }

    /// Build a series from parsed property data, converting every sample.
    /// Missing values fall back to the previous keyframe's legacy end value,
    /// then to `default`.
    pub fn from_property<S>(prop: &Property<S>, converter: impl Fn(&S) -> T, default: T) -> Self {
        match &prop.k {
            Value::Default => Self::constant(default),
            Value::Static(v) => Self::constant(converter(v)),
            Value::Animated(raw) => {
                let mut keyframes = Vec::with_capacity(raw.len());
                for (idx, kf) in raw.iter().enumerate() {
                    let previous_end = idx
                        .checked_sub(1)
                        .and_then(|prev| raw[prev].e.as_ref());
                    let value = kf
                        .s
                        .as_ref()
                        .or(previous_end)
                        .map(&converter)
                        .unwrap_or_else(|| default.clone());

                    let easing = if kf.is_hold() {
                        Easing::Hold
                    } else {
                        match (&kf.o, &kf.i) {
                            (Some(o), Some(i)) => Easing::CubicBezier {
                                out: handle_point(o, 0.0),
                                inn: handle_point(i, 1.0),
                            },
                            _ => Easing::Linear,
                        }
                    };

                    keyframes.push(Keyframe {
                        time: kf.t,
                        value,
                        easing,
                        spatial_tangents: SpatialTangents::from_raw(kf.to.as_ref(), kf.ti.as_ref()),
                    });
                }
                Self::new(keyframes).unwrap_or_else(|| Self::constant(default))
            }
        }
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    pub fn first(&self) -> &Keyframe<T> {
        &self.keyframes[0]
    }

    pub fn last(&self) -> &Keyframe<T> {
        &self.keyframes[self.keyframes.len() - 1]
    }

    pub fn is_constant(&self) -> bool {
        self.keyframes.len() == 1
    }

    pub fn locate(&self, frame: f32) -> Segment {
        // First keyframe strictly after `frame`; the span starts one before it.
        let idx = self.keyframes.partition_point(|kf| kf.time <= frame);
        if idx == 0 {
            Segment::Before
        } else if idx >= self.keyframes.len() {
            Segment::After
        } else {
            Segment::Span(idx - 1)
        }
    }

    /// True when every frame inside `segment` evaluates to the same value.
    pub fn is_flat(&self, segment: Segment) -> bool {
        match segment {
            Segment::Before | Segment::After => true,
            Segment::Span(idx) => self.keyframes[idx].easing == Easing::Hold,
        }
    }

    pub fn evaluate(&self, frame: f32) -> T {
        match self.locate(frame) {
            Segment::Before => self.first().value.clone(),
            Segment::After => self.last().value.clone(),
            Segment::Span(idx) => self.interpolate_span(idx, frame),
        }
    }

    fn interpolate_span(&self, idx: usize, frame: f32) -> T {
        let start = &self.keyframes[idx];
        let end = &self.keyframes[idx + 1];

        if start.easing == Easing::Hold {
            return start.value.clone();
        }

        let duration = end.time - start.time;
        let progress = (frame - start.time) / duration;
        let eased = start.easing.ease(progress);

        start
            .value
            .lerp_spatial(&end.value, eased, start.spatial_tangents.as_ref())
    }
}

fn handle_point(tangent: &data::BezierTangent, fallback: f32) -> Vec2 {
    Vec2::new(
        tangent.x.first().copied().unwrap_or(fallback),
        tangent.y.first().copied().unwrap_or(fallback),
    )
}

/// Evaluate `series` at `frame`, clamping outside its time range.
pub fn evaluate<T: Interpolatable>(series: &KeyframeSeries<T>, frame: f32) -> T {
    series.evaluate(frame)
}
