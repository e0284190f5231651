pub mod session;
pub mod tap;
pub mod transform;

pub use session::{GestureKind, GestureSession};
pub use tap::{TapDetector, TapEvent};
pub use transform::{
    calculate_centroid, calculate_centroid_size, calculate_pan, calculate_rotation,
    calculate_zoom, RecognizerState, TransformGesture, TransformGestureConfig,
    TransformGestureDetector,
};
