use std::fmt;
use std::rc::Rc;

use zoomable_animation::{AnimationType, ExponentialDecaySpec};
use zoomable_foundation::{
    TransformGestureConfig, VelocityStrategy, DOUBLE_TAP_SLOP, DOUBLE_TAP_TIMEOUT_MS,
    MAX_FLING_VELOCITY, TOUCH_SLOP,
};

use crate::bounds::EdgeReleaseAxis;
use crate::error::{validate_scale_range, ZoomConfigError};

/// Scale a double tap zooms to.
#[derive(Clone)]
pub enum DoubleTapScale {
    /// Zoom to the given scale, or back to the minimum if already zoomed in.
    Toggle(f32),
    /// Computes the target from the current scale.
    Dynamic(Rc<dyn Fn(f32) -> f32>),
}

impl DoubleTapScale {
    /// Above `min_scale + ZOOMED_IN_EPSILON` the viewport counts as zoomed in.
    pub const ZOOMED_IN_EPSILON: f32 = 1e-3;

    pub fn dynamic(target: impl Fn(f32) -> f32 + 'static) -> Self {
        DoubleTapScale::Dynamic(Rc::new(target))
    }

    pub fn target_for(&self, current_scale: f32, min_scale: f32) -> f32 {
        match self {
            DoubleTapScale::Toggle(target) => {
                if current_scale > min_scale + Self::ZOOMED_IN_EPSILON {
                    min_scale
                } else {
                    *target
                }
            }
            DoubleTapScale::Dynamic(target) => target(current_scale),
        }
    }
}

impl Default for DoubleTapScale {
    fn default() -> Self {
        DoubleTapScale::Toggle(3.0)
    }
}

impl fmt::Debug for DoubleTapScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoubleTapScale::Toggle(target) => f.debug_tuple("Toggle").field(target).finish(),
            DoubleTapScale::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Options recognised by a [`Zoomable`](crate::Zoomable) viewport.
///
/// ```ignore
/// let config = ZoomableConfig::default()
///     .min_scale(1.0)
///     .max_scale(20.0)
///     .double_tap_scale(DoubleTapScale::Toggle(3.0))
///     .edge_release_axis(EdgeReleaseAxis::Horizontal);
/// ```
#[derive(Clone, Debug)]
pub struct ZoomableConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub double_tap_scale: DoubleTapScale,
    pub edge_release_axis: EdgeReleaseAxis,
    /// When false, pointer input is ignored. Programmatic scale changes
    /// still work.
    pub enabled: bool,
    pub rotation_enabled: bool,
    pub wheel_zoom_enabled: bool,
    /// Animation used by double tap and programmatic animated zoom.
    pub scale_animation: AnimationType,
    pub fling_decay: ExponentialDecaySpec,
    pub touch_slop: f32,
    pub double_tap_timeout_ms: u64,
    pub double_tap_slop: f32,
    pub max_fling_velocity: f32,
    pub velocity_strategy: VelocityStrategy,
}

impl Default for ZoomableConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 5.0,
            double_tap_scale: DoubleTapScale::default(),
            edge_release_axis: EdgeReleaseAxis::default(),
            enabled: true,
            rotation_enabled: false,
            wheel_zoom_enabled: true,
            scale_animation: AnimationType::default(),
            fling_decay: ExponentialDecaySpec::default(),
            touch_slop: TOUCH_SLOP,
            double_tap_timeout_ms: DOUBLE_TAP_TIMEOUT_MS,
            double_tap_slop: DOUBLE_TAP_SLOP,
            max_fling_velocity: MAX_FLING_VELOCITY,
            velocity_strategy: VelocityStrategy::LeastSquares,
        }
    }
}

impl ZoomableConfig {
    pub fn min_scale(mut self, min_scale: f32) -> Self {
        self.min_scale = min_scale;
        self
    }

    pub fn max_scale(mut self, max_scale: f32) -> Self {
        self.max_scale = max_scale;
        self
    }

    pub fn double_tap_scale(mut self, double_tap_scale: DoubleTapScale) -> Self {
        self.double_tap_scale = double_tap_scale;
        self
    }

    pub fn edge_release_axis(mut self, axis: EdgeReleaseAxis) -> Self {
        self.edge_release_axis = axis;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn rotation_enabled(mut self, enabled: bool) -> Self {
        self.rotation_enabled = enabled;
        self
    }

    pub fn wheel_zoom_enabled(mut self, enabled: bool) -> Self {
        self.wheel_zoom_enabled = enabled;
        self
    }

    pub fn scale_animation(mut self, animation: impl Into<AnimationType>) -> Self {
        self.scale_animation = animation.into();
        self
    }

    pub fn fling_decay(mut self, decay: ExponentialDecaySpec) -> Self {
        self.fling_decay = decay;
        self
    }

    pub fn touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn double_tap_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.double_tap_timeout_ms = timeout_ms;
        self
    }

    pub fn double_tap_slop(mut self, slop: f32) -> Self {
        self.double_tap_slop = slop;
        self
    }

    pub fn max_fling_velocity(mut self, velocity: f32) -> Self {
        self.max_fling_velocity = velocity;
        self
    }

    pub fn velocity_strategy(mut self, strategy: VelocityStrategy) -> Self {
        self.velocity_strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ZoomConfigError> {
        validate_scale_range(self.min_scale, self.max_scale)
    }

    pub(crate) fn gesture_config(&self) -> TransformGestureConfig {
        TransformGestureConfig {
            touch_slop: self.touch_slop,
            rotation_enabled: self.rotation_enabled,
            velocity_strategy: self.velocity_strategy,
            max_fling_velocity: self.max_fling_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_zooms_in_then_out() {
        let scale = DoubleTapScale::Toggle(3.0);
        assert_eq!(scale.target_for(1.0, 1.0), 3.0);
        assert_eq!(scale.target_for(1.0005, 1.0), 3.0);
        assert_eq!(scale.target_for(3.0, 1.0), 1.0);
        assert_eq!(scale.target_for(1.5, 1.0), 1.0);
    }

    #[test]
    fn dynamic_target_sees_current_scale() {
        let scale = DoubleTapScale::dynamic(|current| current * 2.0);
        assert_eq!(scale.target_for(1.5, 1.0), 3.0);
        assert_eq!(format!("{scale:?}"), "Dynamic(..)");
    }

    #[test]
    fn builder_sets_options() {
        let config = ZoomableConfig::default()
            .min_scale(0.5)
            .max_scale(20.0)
            .edge_release_axis(EdgeReleaseAxis::None)
            .enabled(false)
            .rotation_enabled(true)
            .touch_slop(4.0);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.edge_release_axis, EdgeReleaseAxis::None);
        assert!(!config.enabled);
        let gestures = config.gesture_config();
        assert!(gestures.rotation_enabled);
        assert_eq!(gestures.touch_slop, 4.0);
    }

    #[test]
    fn invalid_range_rejected() {
        let config = ZoomableConfig::default().min_scale(4.0).max_scale(2.0);
        assert_eq!(
            config.validate(),
            Err(ZoomConfigError::InvalidScaleRange { min: 4.0, max: 2.0 })
        );
    }
}
