//! Testing utilities for the zoomable crates

pub mod robot;

pub use robot::*;

pub mod prelude {
    pub use crate::robot::{GestureRobot, PointerInput};
}
