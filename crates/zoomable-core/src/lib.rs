//! Frame clock runtime for the zoomable crates
//!
//! Animations in this workspace never run on their own thread or block the
//! caller. Each animation registers a one-shot frame callback with a
//! [`FrameClock`]; the host's event loop calls
//! [`RuntimeHandle::drain_frame_callbacks`] once per rendered frame with the
//! frame timestamp, and every animation advances by exactly one step.
//!
//! Dropping a [`FrameCallbackRegistration`] cancels the callback, which is how
//! a superseded animation is discarded.

mod frame_clock;
mod observers;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use observers::{Observers, Subscription};
pub use platform::{Clock, RuntimeScheduler, WebClock};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};

pub(crate) type FrameCallbackId = u64;

pub mod prelude {
    pub use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
    pub use crate::observers::{Observers, Subscription};
    pub use crate::runtime::{Runtime, RuntimeHandle};
}
