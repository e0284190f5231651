//! Velocity tracking for fling gesture support.
//!
//! A ring buffer of timestamped positions per axis. Only samples within
//! [`VELOCITY_HORIZON_MS`] of the newest one contribute, so a slow start does
//! not dampen a fast flick at the end of the gesture. A pause longer than
//! [`ASSUME_STOPPED_MS`] between two samples can also cut the history (see
//! [`StopDetection`]), so a pointer that stopped before lifting reports no
//! velocity.

use zoomable_ui_graphics::Point;

use crate::gesture_constants::VELOCITY_HORIZON_MS;

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 20;

/// Gap after which the pointer is assumed to have stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

/// How the samples inside the horizon are turned into a velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VelocityStrategy {
    /// Slope of the least-squares line through the samples.
    #[default]
    LeastSquares,
    /// Kinetic-energy estimate: each segment adds work proportional to its
    /// speed, so late fast segments dominate.
    Impulse,
}

/// When a pause between two samples ends the usable history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopDetection {
    Off,
    /// Any gap longer than the limit (ms).
    AnyGap(i64),
    /// A gap longer than the limit (ms) across which the position did not
    /// change. Sparse but moving samples still count.
    RestingGap(i64),
}

impl StopDetection {
    fn is_stop(self, gap_ms: i64, moved: bool) -> bool {
        match self {
            StopDetection::Off => false,
            StopDetection::AnyGap(limit) => gap_ms > limit,
            StopDetection::RestingGap(limit) => gap_ms > limit && !moved,
        }
    }
}

/// A data point with timestamp.
#[derive(Clone, Copy, Default)]
struct DataPointAtTime {
    time_ms: i64,
    data_point: f32,
}

/// 1D velocity tracker over absolute positions.
///
/// # Usage
/// ```ignore
/// let mut tracker = VelocityTracker1D::new();
/// tracker.add_data_point(time_ms, position);
/// // ... more points ...
/// let velocity = tracker.calculate_velocity(); // px/sec
/// ```
#[derive(Clone)]
pub struct VelocityTracker1D {
    /// Ring buffer of samples.
    samples: [Option<DataPointAtTime>; HISTORY_SIZE],
    /// Current write index in ring buffer.
    index: usize,
    strategy: VelocityStrategy,
    stop_detection: StopDetection,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self::with_strategy(VelocityStrategy::LeastSquares)
    }

    pub fn impulse() -> Self {
        Self::with_strategy(VelocityStrategy::Impulse)
    }

    /// Least squares stops at resting gaps, impulse at any gap.
    pub fn with_strategy(strategy: VelocityStrategy) -> Self {
        let stop_detection = match strategy {
            VelocityStrategy::LeastSquares => StopDetection::RestingGap(ASSUME_STOPPED_MS),
            VelocityStrategy::Impulse => StopDetection::AnyGap(ASSUME_STOPPED_MS),
        };
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
            strategy,
            stop_detection,
        }
    }

    pub fn with_stop_detection(mut self, stop_detection: StopDetection) -> Self {
        self.stop_detection = stop_detection;
        self
    }

    pub fn strategy(&self) -> VelocityStrategy {
        self.strategy
    }

    /// Adds a position sample at the given time (milliseconds).
    pub fn add_data_point(&mut self, time_ms: i64, data_point: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(DataPointAtTime {
            time_ms,
            data_point,
        });
    }

    /// Number of samples currently held (at most the ring size).
    pub fn sample_count(&self) -> usize {
        self.samples.iter().filter(|sample| sample.is_some()).count()
    }

    /// Calculates the velocity in units/second.
    ///
    /// Returns 0.0 with fewer than two usable samples or when every usable
    /// sample has the same timestamp.
    pub fn calculate_velocity(&self) -> f32 {
        let mut data_points = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut sample_count = 0;

        let newest_sample = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        let mut current_index = self.index;
        let mut previous_sample = newest_sample;

        // Walk newest to oldest.
        while let Some(sample) = self.samples[current_index] {
            let age = (newest_sample.time_ms - sample.time_ms) as f32;
            let gap = (previous_sample.time_ms - sample.time_ms).abs();
            let moved = previous_sample.data_point != sample.data_point;
            previous_sample = sample;

            if age > VELOCITY_HORIZON_MS as f32 {
                break;
            }
            if self.stop_detection.is_stop(gap, moved) {
                break;
            }

            data_points[sample_count] = sample.data_point;
            times[sample_count] = -age;

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };

            sample_count += 1;
            if sample_count >= HISTORY_SIZE {
                break;
            }
        }

        if sample_count < 2 {
            return 0.0;
        }

        let velocity_per_ms = match self.strategy {
            VelocityStrategy::LeastSquares => {
                calculate_least_squares_velocity(&data_points[..sample_count], &times[..sample_count])
            }
            VelocityStrategy::Impulse => {
                calculate_impulse_velocity(&data_points[..sample_count], &times[..sample_count])
            }
        };

        velocity_per_ms * 1000.0
    }

    /// Calculates the velocity in units/second, capped to `max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }

        let velocity = self.calculate_velocity();
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }

        velocity.clamp(-max_velocity, max_velocity)
    }

    /// Clears all tracked data.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Slope of the ordinary least-squares line `x = a + b * t`, in units/ms.
fn calculate_least_squares_velocity(data_points: &[f32], times: &[f32]) -> f32 {
    let count = data_points.len() as f32;
    let mean_t = times.iter().sum::<f32>() / count;
    let mean_x = data_points.iter().sum::<f32>() / count;

    let mut covariance = 0.0f32;
    let mut variance = 0.0f32;
    for (&t, &x) in times.iter().zip(data_points) {
        let dt = t - mean_t;
        covariance += dt * (x - mean_x);
        variance += dt * dt;
    }

    if variance <= f32::EPSILON {
        return 0.0;
    }
    covariance / variance
}

/// Samples are ordered newest first; `times` are non-positive ages.
fn calculate_impulse_velocity(data_points: &[f32], times: &[f32]) -> f32 {
    let sample_count = data_points.len();
    if sample_count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let start = sample_count - 1;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let data_points_delta = data_points[i] - data_points[i - 1];
        let v_curr = data_points_delta / (current_time - next_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// Converts kinetic energy to velocity using E = 0.5 * m * v^2 (with m = 1).
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

/// Two independent [`VelocityTracker1D`]s, one per axis.
#[derive(Clone, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new(strategy: VelocityStrategy) -> Self {
        let axis = match strategy {
            VelocityStrategy::LeastSquares => VelocityTracker1D::new(),
            VelocityStrategy::Impulse => VelocityTracker1D::impulse(),
        };
        Self {
            x: axis.clone(),
            y: axis,
        }
    }

    pub fn add_position(&mut self, time_ms: u64, position: Point) {
        let time_ms = time_ms as i64;
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    pub fn sample_count(&self) -> usize {
        self.x.sample_count()
    }

    /// Velocity in units/second, each axis capped to `max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> Point {
        Point::new(
            self.x.calculate_velocity_with_max(max_velocity),
            self.y.calculate_velocity_with_max(max_velocity),
        )
    }

    pub fn calculate_velocity(&self) -> Point {
        Point::new(self.x.calculate_velocity(), self.y.calculate_velocity())
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_returns_zero() {
        let tracker = VelocityTracker1D::new();
        assert_eq!(tracker.calculate_velocity(), 0.0);
        assert_eq!(VelocityTracker1D::impulse().calculate_velocity(), 0.0);
    }

    #[test]
    fn test_single_point_returns_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn test_two_samples_over_horizon() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(100, 50.0);

        let velocity = tracker.calculate_velocity();
        assert!((velocity - 500.0).abs() < 1.0, "Expected ~500, got {}", velocity);
    }

    #[test]
    fn test_constant_velocity() {
        for mut tracker in [VelocityTracker1D::new(), VelocityTracker1D::impulse()] {
            // Moving at 100 px per 10ms = 10000 px/s
            tracker.add_data_point(0, 0.0);
            tracker.add_data_point(10, 100.0);
            tracker.add_data_point(20, 200.0);
            tracker.add_data_point(30, 300.0);

            let velocity = tracker.calculate_velocity();
            assert!(
                (velocity - 10000.0).abs() < 1000.0,
                "{:?}: expected ~10000, got {}",
                tracker.strategy(),
                velocity
            );
        }
    }

    #[test]
    fn test_reset() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(10, 100.0);

        tracker.reset();

        assert_eq!(tracker.calculate_velocity(), 0.0);
        assert_eq!(tracker.sample_count(), 0);
    }

    #[test]
    fn test_negative_velocity() {
        let mut tracker = VelocityTracker1D::new();
        // Moving backwards
        tracker.add_data_point(0, 300.0);
        tracker.add_data_point(10, 200.0);
        tracker.add_data_point(20, 100.0);

        let velocity = tracker.calculate_velocity();
        assert!(
            velocity < 0.0,
            "Expected negative velocity, got {}",
            velocity
        );
    }

    #[test]
    fn test_velocity_capped() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(1, 10_000.0);

        let velocity = tracker.calculate_velocity_with_max(8_000.0);
        assert_eq!(velocity, 8_000.0);

        tracker.reset();
        tracker.add_data_point(0, 10_000.0);
        tracker.add_data_point(1, 0.0);

        let velocity = tracker.calculate_velocity_with_max(8_000.0);
        assert_eq!(velocity, -8_000.0);
    }

    #[test]
    fn test_old_samples_ignored() {
        let mut tracker = VelocityTracker1D::new();
        // Far outside the horizon, and at a wildly different position.
        tracker.add_data_point(0, -5_000.0);
        tracker.add_data_point(150, 100.0);
        tracker.add_data_point(160, 200.0);
        tracker.add_data_point(170, 300.0);

        let velocity = tracker.calculate_velocity();
        assert!((velocity - 10_000.0).abs() < 1.0, "got {}", velocity);
    }

    #[test]
    fn test_gap_over_stopped_threshold_returns_zero() {
        let mut tracker = VelocityTracker1D::impulse();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);

        // Least squares only stops where the pointer rested.
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(ASSUME_STOPPED_MS + 1, 100.0);
        assert!(tracker.calculate_velocity() > 0.0);

        let mut tracker = VelocityTracker1D::impulse().with_stop_detection(StopDetection::Off);
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(ASSUME_STOPPED_MS + 1, 100.0);
        assert!(tracker.calculate_velocity() > 0.0);
    }

    #[test]
    fn test_short_rest_before_last_sample_returns_zero() {
        for mut tracker in [VelocityTracker1D::new(), VelocityTracker1D::impulse()] {
            for i in 0..=5 {
                tracker.add_data_point(i * 10, i as f32 * 20.0);
            }
            // Rested 60ms, still inside the horizon of the last sample.
            tracker.add_data_point(110, 100.0);
            assert_eq!(tracker.calculate_velocity(), 0.0, "{:?}", tracker.strategy());
        }
    }

    #[test]
    fn test_stationary_sample_after_pause_cancels_fling() {
        for mut tracker in [VelocityTracker1D::new(), VelocityTracker1D::impulse()] {
            for i in 0..=5 {
                tracker.add_data_point(i * 10, i as f32 * 20.0);
            }
            assert!(tracker.calculate_velocity() > 1_000.0);

            // Held still for a while, then lifted where it stopped.
            tracker.add_data_point(2_050, 100.0);
            assert_eq!(tracker.calculate_velocity(), 0.0, "{:?}", tracker.strategy());
        }
    }

    #[test]
    fn test_identical_timestamps_return_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(5, 0.0);
        tracker.add_data_point(5, 40.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn test_ring_buffer_keeps_latest_samples() {
        let mut tracker = VelocityTracker1D::new();
        for i in 0..(HISTORY_SIZE as i64 * 2) {
            tracker.add_data_point(i, i as f32 * 2.0);
        }
        assert_eq!(tracker.sample_count(), HISTORY_SIZE);
        assert!((tracker.calculate_velocity() - 2_000.0).abs() < 1.0);
    }

    #[test]
    fn test_2d_tracker_reports_both_axes() {
        let mut tracker = VelocityTracker::new(VelocityStrategy::LeastSquares);
        tracker.add_position(0, Point::new(0.0, 0.0));
        tracker.add_position(100, Point::new(50.0, -20.0));

        let velocity = tracker.calculate_velocity_with_max(8_000.0);
        assert!((velocity.x - 500.0).abs() < 1.0);
        assert!((velocity.y + 200.0).abs() < 1.0);
        assert_eq!(tracker.sample_count(), 2);
    }
}
