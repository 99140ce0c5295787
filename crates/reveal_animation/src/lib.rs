//! Reveal Animation
//!
//! CSS generation for scroll-triggered reveals.
//!
//! # Features
//!
//! - **Presets**: fade, directional fade, zoom, flip and bounce keyframes
//! - **Timing**: typed duration, delay, easing, iteration, direction and fill
//!   mode rendered as the `animation` shorthand
//! - **Style Registry**: a single identified `<style>` node, replaced
//!   wholesale on every write

pub mod descriptor;
pub mod easing;
pub mod generator;
pub mod keyframe;
pub mod length;
pub mod presets;
pub mod registry;
pub mod timing;

pub use descriptor::{AnimationDescriptor, ClassNames, StyleBody};
pub use easing::Easing;
pub use generator::Animations;
pub use keyframe::{Declarations, KeyframeBody, KeyframeStop, Keyframes, Transform};
pub use length::{Length, LengthUnit};
pub use presets::{
    Direction, Preset, DEFAULT_DISTANCE, DEFAULT_ZOOM_IN_SCALE, DEFAULT_ZOOM_OUT_SCALE,
};
pub use registry::{StyleRegistry, STYLE_ELEMENT_ID};
pub use timing::{AnimationDirection, FillMode, IterationCount, TimingOptions};
