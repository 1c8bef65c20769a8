//! Animator node graph: keyframed properties, value providers and the
//! per-frame update pass that turns them into drawing parameters.

pub mod animatable;
pub mod builder;
pub mod error;
pub mod graph;
pub mod keypath;
pub mod nodes;
pub mod player;
pub mod property;
pub mod provider;
pub mod render;

pub use animatable::{Easing, Interpolatable, Keyframe, KeyframeSeries};
pub use builder::GraphBuilder;
pub use error::{Error, Result};
pub use graph::{AnimationGraph, AnimatorNode, NodeId, PropertyRef, UpdateStats};
pub use keypath::Keypath;
pub use nodes::{NodeKind, ParentContext, Propagation};
pub use player::LottiePlayer;
pub use property::{AnimatableValue, AnyNodeProperty, NodeProperty, PropertyKey, PropertyMap, ValueKind};
pub use provider::{
    ClosureValueProvider, GroupInterpolator, KeyframeInterpolator, SharedGuard, SharedValueProvider,
    SingleValueProvider, ValueProvider,
};
pub use render::{FillRender, GroupRender, PathRender, RenderOutput, StrokeRender};
