//! Animation system for the zoomable crates
//!
//! An [`Animatable`] owns exactly one `f32` and at most one in-flight
//! animation of it. Starting another animation, snapping, or stopping
//! cancels the previous one where it stands; nothing is queued and nothing
//! rolls back.

mod animatable;
mod animation;
mod decay_spec;

pub use animatable::{Animatable, AnimationEndReason};
pub use animation::{AnimationSpec, AnimationType, Easing, SpringSpec};
pub use decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};
