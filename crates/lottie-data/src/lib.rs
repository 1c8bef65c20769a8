//! Parsed animation data consumed by `lottie-core`.
//!
//! The types mirror the JSON layout field for field; all evaluation logic
//! lives in the core crate.

pub mod model;
