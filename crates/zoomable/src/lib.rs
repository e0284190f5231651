//! Pan/zoom transform engine for touch-driven content viewers
//!
//! A [`Zoomable`] turns raw pointer events into a continuously updated
//! [`Transform`] (scale, translation, optional rotation) for one piece of
//! content in one viewport:
//!
//! - single-finger drags pan, with fling on release;
//! - multi-finger pinches zoom around the pinch centroid;
//! - double tap toggles between the minimum scale and a target scale focused
//!   on the tap point;
//! - drags that run into an edge on the configured axis are released to the
//!   parent container (for example a pager), see [`PointerDisposition`].
//!
//! Everything is single-threaded and driven by the host: pointer events go to
//! [`Zoomable::on_pointer_event`], and animations advance when the host drains
//! the [`zoomable_core::Runtime`]'s frame callbacks once per frame.
//! Renderers either poll [`ZoomState::transform`] or
//! [`subscribe`](ZoomState::subscribe).

mod bounds;
mod config;
mod error;
mod saved_state;
mod transform;
pub mod zoom_math;
mod zoom_state;
mod zoomable;

pub use bounds::{Bounds, EdgeReleaseAxis};
pub use config::{DoubleTapScale, ZoomableConfig};
pub use error::{SavedStateError, ZoomConfigError};
pub use saved_state::SavedZoomState;
pub use transform::Transform;
pub use zoom_state::ZoomState;
pub use zoomable::{PointerDisposition, Zoomable};

pub use zoomable_animation::{
    AnimationSpec, AnimationType, Easing, ExponentialDecaySpec, SpringSpec,
};
pub use zoomable_foundation::{PointerEvent, PointerEventKind, PointerId, VelocityStrategy};
pub use zoomable_ui_graphics::{Point, Size};

pub mod prelude {
    pub use crate::bounds::EdgeReleaseAxis;
    pub use crate::config::{DoubleTapScale, ZoomableConfig};
    pub use crate::transform::Transform;
    pub use crate::zoom_state::ZoomState;
    pub use crate::zoomable::{PointerDisposition, Zoomable};
    pub use zoomable_foundation::PointerEvent;
    pub use zoomable_ui_graphics::{Point, Size};
}
