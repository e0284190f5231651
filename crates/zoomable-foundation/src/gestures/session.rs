//! State of one pointer-down to pointer-up cycle.

use zoomable_ui_graphics::Point;

use crate::velocity_tracker::{VelocityStrategy, VelocityTracker};

/// What a session turned out to be. Decided once, when the touch slop is
/// crossed, and never changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Undetermined,
    Drag,
    Transform,
}

#[derive(Clone)]
pub struct GestureSession {
    start_time_ms: u64,
    kind: GestureKind,
    past_slop: bool,
    /// Running totals used for the slop test.
    pan_total: Point,
    zoom_total: f32,
    rotation_total: f32,
    /// Sum of every pan delta; the velocity tracker samples this so that
    /// pointers joining or leaving do not look like jumps.
    pan_position: Point,
    max_pointers: usize,
    tracker: VelocityTracker,
}

impl GestureSession {
    pub fn new(start_time_ms: u64, strategy: VelocityStrategy) -> Self {
        let mut tracker = VelocityTracker::new(strategy);
        tracker.add_position(start_time_ms, Point::ZERO);
        Self {
            start_time_ms,
            kind: GestureKind::Undetermined,
            past_slop: false,
            pan_total: Point::ZERO,
            zoom_total: 1.0,
            rotation_total: 0.0,
            pan_position: Point::ZERO,
            max_pointers: 1,
            tracker,
        }
    }

    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn is_past_slop(&self) -> bool {
        self.past_slop
    }

    /// Largest number of simultaneous pointers seen in this session.
    pub fn max_pointers(&self) -> usize {
        self.max_pointers
    }

    pub fn note_pointer_count(&mut self, count: usize) {
        self.max_pointers = self.max_pointers.max(count);
    }

    /// Records one frame of movement and returns true on the frame the slop
    /// is first exceeded.
    ///
    /// `span` is the current average distance of the pointers to their
    /// centroid; zoom and rotation only count as motion in proportion to it.
    pub fn accumulate(
        &mut self,
        time_ms: u64,
        pan: Point,
        zoom: f32,
        rotation_degrees: f32,
        span: f32,
        touch_slop: f32,
    ) -> bool {
        self.pan_position += pan;
        self.tracker.add_position(time_ms, self.pan_position);

        if self.past_slop {
            return false;
        }

        self.pan_total += pan;
        self.zoom_total *= zoom;
        self.rotation_total += rotation_degrees;

        let pan_motion = self.pan_total.length();
        let zoom_motion = (1.0 - self.zoom_total).abs() * span;
        let rotation_motion = (self.rotation_total.to_radians() * span).abs();

        if pan_motion > touch_slop || zoom_motion > touch_slop || rotation_motion > touch_slop {
            self.past_slop = true;
            return true;
        }
        false
    }

    /// Fixes the session kind. Only the first call has an effect.
    pub fn lock_kind(&mut self, kind: GestureKind) -> bool {
        if self.kind != GestureKind::Undetermined || kind == GestureKind::Undetermined {
            return false;
        }
        self.kind = kind;
        true
    }

    /// Movement accumulated while the slop was pending.
    pub fn total_pan(&self) -> Point {
        self.pan_total
    }

    pub fn sample_count(&self) -> usize {
        self.tracker.sample_count()
    }

    /// Records where the pointers were when the last one lifted, so a pause
    /// before lifting is seen by the velocity estimate.
    pub fn finish(&mut self, time_ms: u64) {
        self.tracker.add_position(time_ms, self.pan_position);
    }

    /// Release velocity in units/second, zero for sessions with fewer than
    /// two samples.
    pub fn velocity(&self, max_velocity: f32) -> Point {
        self.tracker.calculate_velocity_with_max(max_velocity)
    }
}

impl std::fmt::Debug for GestureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureSession")
            .field("start_time_ms", &self.start_time_ms)
            .field("kind", &self.kind)
            .field("past_slop", &self.past_slop)
            .field("pan_position", &self.pan_position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_under_slop_is_not_a_gesture() {
        let mut session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        for (i, dx) in [2.0, -3.0, 2.5, -1.0].into_iter().enumerate() {
            let crossed =
                session.accumulate(i as u64 * 10, Point::new(dx, 1.0), 1.0, 0.0, 0.0, 8.0);
            assert!(!crossed);
        }
        assert!(!session.is_past_slop());
    }

    #[test]
    fn slop_crossing_reported_once() {
        let mut session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        assert!(!session.accumulate(10, Point::new(5.0, 0.0), 1.0, 0.0, 0.0, 8.0));
        assert!(session.accumulate(20, Point::new(5.0, 0.0), 1.0, 0.0, 0.0, 8.0));
        assert!(!session.accumulate(30, Point::new(5.0, 0.0), 1.0, 0.0, 0.0, 8.0));
        assert!(session.is_past_slop());
    }

    #[test]
    fn pinch_crosses_slop_through_zoom() {
        let mut session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        // 10% zoom over a 100px span is 10px of motion.
        assert!(session.accumulate(10, Point::ZERO, 1.1, 0.0, 100.0, 8.0));
    }

    #[test]
    fn kind_is_immutable_once_locked() {
        let mut session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        assert!(!session.lock_kind(GestureKind::Undetermined));
        assert!(session.lock_kind(GestureKind::Drag));
        assert!(!session.lock_kind(GestureKind::Transform));
        assert_eq!(session.kind(), GestureKind::Drag);
    }

    #[test]
    fn velocity_follows_pan_position() {
        let mut session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        session.accumulate(100, Point::new(50.0, 0.0), 1.0, 0.0, 0.0, 8.0);
        let velocity = session.velocity(8_000.0);
        assert!((velocity.x - 500.0).abs() < 1.0);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn finishing_after_a_pause_drops_the_velocity() {
        let mut session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        for step in 1..=5u64 {
            session.accumulate(step * 10, Point::new(20.0, 0.0), 1.0, 0.0, 0.0, 8.0);
        }
        session.finish(50);
        assert!(session.velocity(8_000.0).x > 1_000.0);

        session.finish(2_050);
        assert_eq!(session.velocity(8_000.0), Point::ZERO);
    }

    #[test]
    fn fresh_session_has_zero_velocity() {
        let session = GestureSession::new(0, VelocityStrategy::LeastSquares);
        assert_eq!(session.sample_count(), 1);
        assert_eq!(session.velocity(8_000.0), Point::ZERO);
    }
}
