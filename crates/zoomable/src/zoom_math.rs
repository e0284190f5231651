//! Focal-point zoom.
//!
//! With the layout convention used throughout this crate a content point `q`
//! is drawn at `viewport_center + translation + scale * (q - content_size / 2)`.
//! Scaling by `k` therefore moves every drawn point away from
//! `viewport_center + translation` by a factor of `k`; the functions here
//! compute the translation change that cancels that movement at one point.

use zoomable_ui_graphics::Point;

/// Translation change that keeps the content under `focal` in place when the
/// scale is multiplied by `zoom`.
///
/// `center` is the viewport center and `offset` the current translation.
/// The vector from the content's drawn center to the focal point is scaled
/// in polar form; a focal point on the drawn center yields no change.
pub fn zoom_to_point_delta(focal: Point, center: Point, offset: Point, zoom: f32) -> Point {
    let vector = focal - (center + offset);
    let hypot = vector.length();
    if hypot <= f32::EPSILON || !hypot.is_finite() || !zoom.is_finite() {
        return Point::ZERO;
    }
    // atan2 handles vertical vectors without dividing by `vector.x`.
    let angle = vector.angle();
    let scaled = Point::from_polar(hypot * zoom, angle);
    vector - scaled
}

/// Translation after zooming by `zoom` around `focal`.
pub fn translation_after_zoom(focal: Point, center: Point, offset: Point, zoom: f32) -> Point {
    offset + zoom_to_point_delta(focal, center, offset, zoom)
}
