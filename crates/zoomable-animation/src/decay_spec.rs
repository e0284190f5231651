//! Decay animation specification for fling animations.
//!
//! A decay animation has no target: it starts at a value with a velocity and
//! slows down until the velocity falls under a threshold.

/// Base friction of the exponential decay curve.
const EXPONENTIAL_DECAY_FRICTION: f32 = -4.2;

/// Default velocity (units/second) under which a decay is considered stopped.
const DEFAULT_ABS_VELOCITY_THRESHOLD: f32 = 0.1;

/// Trait for decay animation specs that compute position and velocity over time.
pub trait FloatDecayAnimationSpec {
    /// The absolute velocity threshold below which the animation is considered stopped.
    fn abs_velocity_threshold(&self) -> f32;

    /// Get the value at a given time.
    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    /// Get velocity at a given time.
    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    /// Get total animation duration in nanoseconds.
    fn get_duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> i64;

    /// Get the target value (final position) of the animation.
    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;
}

/// Exponential decay: the velocity shrinks by a constant factor per unit of
/// time, `v(t) = v0 * e^(friction * t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    friction: f32,
    abs_velocity_threshold: f32,
}

impl ExponentialDecaySpec {
    /// `friction_multiplier` scales how quickly the motion stops; larger values
    /// stop sooner. `abs_velocity_threshold` is in units per second.
    pub fn new(friction_multiplier: f32, abs_velocity_threshold: f32) -> Self {
        Self {
            friction: EXPONENTIAL_DECAY_FRICTION * friction_multiplier.max(0.0001),
            abs_velocity_threshold: abs_velocity_threshold.abs().max(0.0001),
        }
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_ABS_VELOCITY_THRESHOLD)
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos as f32 / 1_000_000_000.0;
        initial_value - initial_velocity / self.friction
            + initial_velocity / self.friction * (self.friction * seconds).exp()
    }

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = play_time_nanos as f32 / 1_000_000_000.0;
        initial_velocity * (self.friction * seconds).exp()
    }

    fn get_duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> i64 {
        if initial_velocity.abs() <= self.abs_velocity_threshold {
            return 0;
        }
        let seconds = (self.abs_velocity_threshold / initial_velocity.abs()).ln() / self.friction;
        (seconds * 1_000_000_000.0) as i64
    }

    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value - initial_velocity / self.friction
    }
}
