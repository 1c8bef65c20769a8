//! Value providers supply a property's value for a frame and report whether
//! that value changed since they were last read.

use crate::animatable::{Interpolatable, KeyframeSeries, Segment};
use lottie_data::model::Property;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

pub trait ValueProvider<T> {
    /// Whether reading at `frame` could yield something different from the
    /// last value this provider handed out.
    fn has_update(&self, frame: f32) -> bool;

    fn value(&mut self, frame: f32) -> T;

    /// Write the value for `frame` into an existing slot. Providers producing
    /// heap values override this to reuse the slot's allocation.
    fn write_value(&mut self, frame: f32, slot: &mut T) {
        *slot = self.value(frame);
    }
}

/// A fixed value. Reports an update until it is read, and again after every
/// `set_value`.
#[derive(Debug, Clone)]
pub struct SingleValueProvider<T> {
    value: T,
    has_update: bool,
}

impl<T: Clone> SingleValueProvider<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            has_update: true,
        }
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
        self.has_update = true;
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> ValueProvider<T> for SingleValueProvider<T> {
    fn has_update(&self, _frame: f32) -> bool {
        self.has_update
    }

    fn value(&mut self, _frame: f32) -> T {
        self.has_update = false;
        self.value.clone()
    }

    fn write_value(&mut self, _frame: f32, slot: &mut T) {
        self.has_update = false;
        slot.clone_from(&self.value);
    }
}

/// Computes the value with a callback. The callback is treated as a pure
/// function of the frame, so only a frame change counts as an update. A
/// callback that also reads outside state is not re-run while the frame stays
/// the same; call `invalidate` after that state changes.
pub struct ClosureValueProvider<T> {
    block: Arc<dyn Fn(f32) -> T + Send + Sync>,
    last_frame: Option<f32>,
}

impl<T> ClosureValueProvider<T> {
    pub fn new(block: impl Fn(f32) -> T + Send + Sync + 'static) -> Self {
        Self {
            block: Arc::new(block),
            last_frame: None,
        }
    }

    /// Report an update on the next check regardless of the frame.
    pub fn invalidate(&mut self) {
        self.last_frame = None;
    }
}

impl<T> Clone for ClosureValueProvider<T> {
    fn clone(&self) -> Self {
        Self {
            block: Arc::clone(&self.block),
            last_frame: None,
        }
    }
}

impl<T> fmt::Debug for ClosureValueProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureValueProvider")
            .field("last_frame", &self.last_frame)
            .finish_non_exhaustive()
    }
}

impl<T> ValueProvider<T> for ClosureValueProvider<T> {
    fn has_update(&self, frame: f32) -> bool {
        self.last_frame != Some(frame)
    }

    fn value(&mut self, frame: f32) -> T {
        self.last_frame = Some(frame);
        (self.block)(frame)
    }
}

/// Interpolates a keyframe series. Frames that land in the same flat region
/// as the previous read (before the first keyframe, after the last one, or
/// inside one hold span) do not count as updates.
#[derive(Debug, Clone)]
pub struct KeyframeInterpolator<T> {
    series: Arc<KeyframeSeries<T>>,
    last: Option<(f32, Segment)>,
}

impl<T: Interpolatable> KeyframeInterpolator<T> {
    pub fn new(series: KeyframeSeries<T>) -> Self {
        Self {
            series: Arc::new(series),
            last: None,
        }
    }

    pub fn from_property<S>(prop: &Property<S>, converter: impl Fn(&S) -> T, default: T) -> Self {
        Self::new(KeyframeSeries::from_property(prop, converter, default))
    }

    pub fn series(&self) -> &KeyframeSeries<T> {
        &self.series
    }
}

impl<T: Interpolatable> ValueProvider<T> for KeyframeInterpolator<T> {
    fn has_update(&self, frame: f32) -> bool {
        let Some((last_frame, last_segment)) = self.last else {
            return true;
        };
        if last_frame == frame || self.series.is_constant() {
            return false;
        }
        let segment = self.series.locate(frame);
        !(segment == last_segment && self.series.is_flat(segment))
    }

    fn value(&mut self, frame: f32) -> T {
        self.last = Some((frame, self.series.locate(frame)));
        self.series.evaluate(frame)
    }
}

/// Combines several scalar series into one ordered list, e.g. the dash
/// lengths of a stroke.
#[derive(Debug, Clone, Default)]
pub struct GroupInterpolator {
    members: Vec<KeyframeInterpolator<f32>>,
}

impl GroupInterpolator {
    pub fn new(groups: Vec<KeyframeSeries<f32>>) -> Self {
        Self {
            members: groups.into_iter().map(KeyframeInterpolator::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl ValueProvider<Vec<f32>> for GroupInterpolator {
    fn has_update(&self, frame: f32) -> bool {
        self.members.iter().any(|member| member.has_update(frame))
    }

    fn value(&mut self, frame: f32) -> Vec<f32> {
        let mut values = Vec::with_capacity(self.members.len());
        self.write_value(frame, &mut values);
        values
    }

    fn write_value(&mut self, frame: f32, slot: &mut Vec<f32>) {
        slot.clear();
        slot.extend(self.members.iter_mut().map(|member| member.value(frame)));
    }
}

/// A provider the caller keeps a handle to after installing it, e.g. to
/// change a color from UI code between frames. The state lives behind a
/// mutex, so the handle may be used from another thread.
///
/// Every clone tracks its own read position. Installing one handle on several
/// properties is fine: a change is seen by each of them, not only by the
/// first one to read.
pub struct SharedValueProvider<P> {
    inner: Arc<Mutex<SharedState<P>>>,
    seen: Option<u64>,
}

struct SharedState<P> {
    provider: P,
    /// Bumped on every mutable access through a handle and on every read
    /// that consumed an update of the wrapped provider.
    generation: u64,
}

impl<P> SharedValueProvider<P> {
    pub fn new(provider: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SharedState {
                provider,
                generation: 0,
            })),
            seen: None,
        }
    }

    /// Lock the wrapped provider. Mutable access through the guard marks
    /// every installed clone as out of date.
    pub fn lock(&self) -> SharedGuard<'_, P> {
        SharedGuard {
            state: self.state(),
        }
    }

    // Providers hold plain values that stay valid after a panic elsewhere,
    // so a poisoned lock is recovered.
    fn state(&self) -> MutexGuard<'_, SharedState<P>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub struct SharedGuard<'a, P> {
    state: MutexGuard<'a, SharedState<P>>,
}

impl<P> Deref for SharedGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.state.provider
    }
}

impl<P> DerefMut for SharedGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.state.generation = self.state.generation.wrapping_add(1);
        &mut self.state.provider
    }
}

impl<P> Clone for SharedValueProvider<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            seen: None,
        }
    }
}

impl<P> fmt::Debug for SharedValueProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValueProvider")
            .field("handles", &Arc::strong_count(&self.inner))
            .field("seen", &self.seen)
            .finish()
    }
}

impl<P> SharedValueProvider<P> {
    /// Marks this clone as caught up. A read that consumes an update of the
    /// wrapped provider starts a new generation for the other clones.
    fn begin_read<T>(&mut self, frame: f32) -> MutexGuard<'_, SharedState<P>>
    where
        P: ValueProvider<T>,
    {
        let mut state = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.provider.has_update(frame) {
            state.generation = state.generation.wrapping_add(1);
        }
        self.seen = Some(state.generation);
        state
    }
}

impl<T, P: ValueProvider<T>> ValueProvider<T> for SharedValueProvider<P> {
    fn has_update(&self, frame: f32) -> bool {
        let state = self.state();
        self.seen != Some(state.generation) || state.provider.has_update(frame)
    }

    fn value(&mut self, frame: f32) -> T {
        self.begin_read::<T>(frame).provider.value(frame)
    }

    fn write_value(&mut self, frame: f32, slot: &mut T) {
        self.begin_read::<T>(frame).provider.write_value(frame, slot);
    }
}
