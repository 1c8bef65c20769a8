use crate::error::Result;
use crate::graph::{AnimationGraph, UpdateStats};
use lottie_data::model::{LottieJson, Marker};

/// Drives an [`AnimationGraph`] from wall-clock time, looping over the
/// animation's in/out range.
pub struct LottiePlayer {
    pub graph: AnimationGraph,
    pub current_frame: f32,
    pub frame_rate: f32,
    pub in_point: f32,
    pub out_point: f32,
    pub markers: Vec<Marker>,
}

impl LottiePlayer {
    pub fn new(graph: AnimationGraph, frame_rate: f32, in_point: f32, out_point: f32) -> Self {
        Self {
            graph,
            current_frame: in_point,
            frame_rate,
            in_point,
            out_point,
            markers: Vec::new(),
        }
    }

    pub fn from_model(model: &LottieJson) -> Result<Self> {
        let graph = AnimationGraph::from_model(model)?;
        let mut player = Self::new(graph, model.fr, model.ip, model.op);
        player.markers = model.markers.clone();
        Ok(player)
    }

    pub fn duration_frames(&self) -> f32 {
        (self.out_point - self.in_point).max(0.0)
    }

    /// `dt` is in seconds.
    pub fn advance(&mut self, dt: f32) {
        let duration = self.duration_frames();
        if duration <= 0.0 {
            self.current_frame = self.in_point;
            return;
        }
        let frame = self.current_frame + dt * self.frame_rate;
        self.current_frame = self.in_point + (frame - self.in_point).rem_euclid(duration);
    }

    pub fn set_frame(&mut self, frame: f32) {
        self.current_frame = frame.clamp(self.in_point, self.out_point.max(self.in_point));
    }

    pub fn update(&mut self) -> UpdateStats {
        self.graph.update(self.current_frame)
    }

    fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.cm.as_deref() == Some(name))
    }

    pub fn marker_frame(&self, name: &str) -> Option<f32> {
        self.marker(name)?.tm
    }

    /// Start and end frame of a marker; a marker without duration is a
    /// single frame.
    pub fn marker_range(&self, name: &str) -> Option<(f32, f32)> {
        let marker = self.marker(name)?;
        let start = marker.tm?;
        Some((start, start + marker.dr.unwrap_or(0.0)))
    }

    pub fn progress_for_frame(&self, frame: f32) -> f32 {
        let duration = self.duration_frames();
        if duration <= 0.0 {
            return 0.0;
        }
        (frame - self.in_point) / duration
    }

    pub fn frame_for_progress(&self, progress: f32) -> f32 {
        self.in_point + progress * self.duration_frames()
    }
}
