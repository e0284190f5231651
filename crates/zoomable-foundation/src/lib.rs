//! Pointer input and gesture recognition for the zoomable crates
//!
//! Everything here is synchronous and allocation-light: the host feeds one
//! [`PointerEvent`] at a time and gets back at most one recognised gesture.
//! Nothing in this crate mutates a transform; that is left to the caller.

pub mod gesture_constants;
pub mod gestures;
pub mod input;
pub mod velocity_tracker;

pub use gesture_constants::*;
pub use gestures::{
    GestureKind, GestureSession, RecognizerState, TapDetector, TapEvent, TransformGesture,
    TransformGestureConfig, TransformGestureDetector,
};
pub use input::{PointerEvent, PointerEventKind, PointerId};
pub use velocity_tracker::{StopDetection, VelocityStrategy, VelocityTracker, VelocityTracker1D};

pub mod prelude {
    pub use crate::gestures::{TapDetector, TransformGesture, TransformGestureDetector};
    pub use crate::input::{PointerEvent, PointerEventKind};
}
