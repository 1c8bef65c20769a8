//! Cached properties and the fixed per-kind property maps built from them.

use crate::provider::ValueProvider;
use glam::{Vec2, Vec3, Vec4};
use lottie_data::model::BezierPath;
use std::any::Any;
use std::fmt;

/// Value type carried by a property, used to check overrides at the call
/// site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ValueKind {
    Scalar,
    Vector2,
    Vector3,
    Color,
    ScalarList,
    Shape,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Vector2 => "vector2",
            ValueKind::Vector3 => "vector3",
            ValueKind::Color => "color",
            ValueKind::ScalarList => "scalar list",
            ValueKind::Shape => "shape",
        };
        f.write_str(name)
    }
}

pub trait AnimatableValue: Clone + Default + 'static {
    const KIND: ValueKind;
}

impl AnimatableValue for f32 {
    const KIND: ValueKind = ValueKind::Scalar;
}

impl AnimatableValue for Vec2 {
    const KIND: ValueKind = ValueKind::Vector2;
}

impl AnimatableValue for Vec3 {
    const KIND: ValueKind = ValueKind::Vector3;
}

impl AnimatableValue for Vec4 {
    const KIND: ValueKind = ValueKind::Color;
}

impl AnimatableValue for Vec<f32> {
    const KIND: ValueKind = ValueKind::ScalarList;
}

impl AnimatableValue for BezierPath {
    const KIND: ValueKind = ValueKind::Shape;
}

/// A value provider paired with the last value read from it.
pub struct NodeProperty<T: AnimatableValue> {
    provider: Box<dyn ValueProvider<T>>,
    value: T,
    last_frame: Option<f32>,
    dirty: bool,
}

impl<T: AnimatableValue> NodeProperty<T> {
    pub fn new(provider: impl ValueProvider<T> + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            value: T::default(),
            last_frame: None,
            dirty: true,
        }
    }

    pub fn needs_update(&self, frame: f32) -> bool {
        self.dirty || self.provider.has_update(frame)
    }

    /// Refresh the cache from the provider if it has anything new for
    /// `frame`.
    pub fn update(&mut self, frame: f32) {
        if self.needs_update(frame) {
            self.provider.write_value(frame, &mut self.value);
            self.last_frame = Some(frame);
            self.dirty = false;
        }
    }

    /// Current value at `frame`. Repeated calls for the same frame hit the
    /// cache.
    pub fn value_at(&mut self, frame: f32) -> &T {
        self.update(frame);
        &self.value
    }

    /// The cached value as of the last update.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn last_frame(&self) -> Option<f32> {
        self.last_frame
    }

    /// Install a new provider; the next update reads from it unconditionally.
    pub fn set_provider(&mut self, provider: impl ValueProvider<T> + 'static) {
        self.provider = Box::new(provider);
        self.dirty = true;
    }
}

impl<T: AnimatableValue + fmt::Debug> fmt::Debug for NodeProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeProperty")
            .field("value", &self.value)
            .field("last_frame", &self.last_frame)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Type-erased view of a [`NodeProperty`].
pub trait AnyNodeProperty {
    fn value_kind(&self) -> ValueKind;
    fn needs_update(&self, frame: f32) -> bool;
    fn update(&mut self, frame: f32);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: AnimatableValue> AnyNodeProperty for NodeProperty<T> {
    fn value_kind(&self) -> ValueKind {
        T::KIND
    }

    fn needs_update(&self, frame: f32) -> bool {
        NodeProperty::needs_update(self, frame)
    }

    fn update(&mut self, frame: f32) {
        NodeProperty::update(self, frame);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<'a> dyn AnyNodeProperty + 'a {
    pub fn downcast_ref<T: AnimatableValue>(&self) -> Option<&NodeProperty<T>> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: AnimatableValue>(&mut self) -> Option<&mut NodeProperty<T>> {
        self.as_any_mut().downcast_mut()
    }
}

/// Closed set of property identifiers of one node kind. `ALL` doubles as the
/// static name table for keypath lookups.
pub trait PropertyKey: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

/// The properties of one node kind, addressed by its key enum.
pub trait PropertyMap {
    type Key: PropertyKey;

    fn property(&self, key: Self::Key) -> &dyn AnyNodeProperty;

    fn property_mut(&mut self, key: Self::Key) -> &mut dyn AnyNodeProperty;

    fn needs_local_update(&self, frame: f32) -> bool {
        Self::Key::ALL
            .iter()
            .any(|&key| self.property(key).needs_update(frame))
    }

    fn update_properties(&mut self, frame: f32) {
        for &key in Self::Key::ALL {
            self.property_mut(key).update(frame);
        }
    }

    fn keypath_property(&self, name: &str) -> Option<&dyn AnyNodeProperty> {
        Self::Key::from_name(name).map(|key| self.property(key))
    }

    fn keypath_property_mut(&mut self, name: &str) -> Option<&mut dyn AnyNodeProperty> {
        match Self::Key::from_name(name) {
            Some(key) => Some(self.property_mut(key)),
            None => None,
        }
    }

    fn property_names(&self) -> Vec<&'static str> {
        Self::Key::ALL.iter().map(|key| key.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animatable::{Keyframe, KeyframeSeries};
    use crate::provider::{KeyframeInterpolator, SingleValueProvider};

    #[test]
    fn test_value_at_is_cached_per_frame() {
        let series = KeyframeSeries::new(vec![Keyframe::new(0.0, 0.0_f32), Keyframe::new(10.0, 10.0)])
            .expect("non-empty series");
        let mut prop = NodeProperty::new(KeyframeInterpolator::new(series));

        assert!(prop.needs_update(3.0));
        assert_eq!(*prop.value_at(3.0), 3.0);
        assert_eq!(prop.last_frame(), Some(3.0));
        assert!(!prop.needs_update(3.0));
        assert_eq!(*prop.value_at(3.0), 3.0);
        assert_eq!(*prop.value_at(4.0), 4.0);
    }

    #[test]
    fn test_replacing_provider_marks_dirty() {
        let mut prop = NodeProperty::new(SingleValueProvider::new(1.0_f32));
        prop.update(0.0);
        assert!(!prop.needs_update(0.0));

        prop.set_provider(SingleValueProvider::new(2.0));
        assert!(prop.needs_update(0.0));
        prop.update(0.0);
        assert_eq!(*prop.value(), 2.0);
    }

    #[test]
    fn test_downcast_checks_value_type() {
        let mut prop = NodeProperty::new(SingleValueProvider::new(Vec4::ONE));
        let erased: &mut dyn AnyNodeProperty = &mut prop;
        assert_eq!(erased.value_kind(), ValueKind::Color);
        assert!(erased.downcast_mut::<f32>().is_none());
        assert!(erased.downcast_mut::<Vec4>().is_some());
    }
}
