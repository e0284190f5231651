//! Shared gesture constants for consistent touch/pointer handling.
//!
//! These values are in logical pixels and milliseconds. For very high-density
//! touch screens, consider scaling the distances by the device's DPI factor.

/// Touch slop in logical pixels.
///
/// Cumulative movement below this distance is treated as finger jitter: a
/// press that stays inside it is a tap, and nothing is applied to the
/// transform until it is exceeded. Matches Android's
/// `ViewConfiguration.TOUCH_SLOP` (~8dp).
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Alias used by the gesture detectors.
pub const TOUCH_SLOP: f32 = DRAG_THRESHOLD;

/// Maximum fling velocity in logical pixels per second.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Maximum time between the first tap's release and the second tap's press
/// for the pair to count as a double tap.
pub const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// Maximum distance between the two taps of a double tap.
pub const DOUBLE_TAP_SLOP: f32 = 100.0;

/// Scale factor applied per logical pixel of wheel scroll:
/// `zoom = exp(-delta_y * WHEEL_ZOOM_FACTOR)`.
pub const WHEEL_ZOOM_FACTOR: f32 = 0.002;

/// Velocity samples older than this (relative to the newest) are ignored.
pub const VELOCITY_HORIZON_MS: i64 = 100;
