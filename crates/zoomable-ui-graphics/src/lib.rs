//! Pure geometry value types for the zoomable crates
//!
//! This crate contains the point, size and rectangle types used to describe
//! pointer positions, content and viewport extents, and translation vectors.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
}
