//! Single and double tap recognition.
//!
//! A tap is a single-pointer press released without crossing the touch slop.
//! A tap is only reported as a single tap once it can no longer become the
//! first half of a double tap, so callers poll [`TapDetector::poll`] (for
//! example from a frame callback) until the timeout has elapsed.

use zoomable_ui_graphics::Point;

use crate::gesture_constants::{DOUBLE_TAP_SLOP, DOUBLE_TAP_TIMEOUT_MS};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapEvent {
    SingleTap(Point),
    DoubleTap(Point),
}

#[derive(Clone, Copy, Debug)]
struct PendingTap {
    position: Point,
    up_time_ms: u64,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    position: Point,
    /// Whether this press is the second half of a double tap.
    second_tap: bool,
}

#[derive(Clone, Debug)]
pub struct TapDetector {
    double_tap_timeout_ms: u64,
    double_tap_slop: f32,
    pending: Option<PendingTap>,
    press: Option<Press>,
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_TIMEOUT_MS, DOUBLE_TAP_SLOP)
    }
}

impl TapDetector {
    pub fn new(double_tap_timeout_ms: u64, double_tap_slop: f32) -> Self {
        Self {
            double_tap_timeout_ms,
            double_tap_slop,
            pending: None,
            press: None,
        }
    }

    /// Whether a tap is waiting for either a second tap or the timeout.
    pub fn has_pending_tap(&self) -> bool {
        self.pending.is_some()
    }

    /// First pointer of a session went down. May confirm an expired pending
    /// tap as a single tap.
    pub fn on_press(&mut self, time_ms: u64, position: Point) -> Option<TapEvent> {
        let mut confirmed = None;
        let mut second_tap = false;
        if let Some(pending) = self.pending {
            let elapsed = time_ms.saturating_sub(pending.up_time_ms);
            let distance = pending.position.distance(position);
            if elapsed <= self.double_tap_timeout_ms && distance <= self.double_tap_slop {
                second_tap = true;
            } else {
                self.pending = None;
                confirmed = Some(TapEvent::SingleTap(pending.position));
            }
        }
        self.press = Some(Press {
            position,
            second_tap,
        });
        confirmed
    }

    /// The press turned into something other than a tap: slop crossed,
    /// second pointer, or cancellation. Any waiting first tap is dropped too.
    pub fn cancel(&mut self) {
        self.press = None;
        self.pending = None;
    }

    /// Last pointer of a tap-sized session was released.
    pub fn on_release(&mut self, time_ms: u64, position: Point) -> Option<TapEvent> {
        let press = self.press.take()?;
        if press.second_tap {
            self.pending = None;
            log::debug!("double tap at {:?}", press.position);
            return Some(TapEvent::DoubleTap(press.position));
        }
        self.pending = Some(PendingTap {
            position,
            up_time_ms: time_ms,
        });
        None
    }

    /// Confirms a pending tap as a single tap once the double-tap timeout has
    /// passed without a second press.
    pub fn poll(&mut self, now_ms: u64) -> Option<TapEvent> {
        if self.press.is_some() {
            return None;
        }
        let pending = self.pending?;
        if now_ms.saturating_sub(pending.up_time_ms) > self.double_tap_timeout_ms {
            self.pending = None;
            return Some(TapEvent::SingleTap(pending.position));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(detector: &mut TapDetector, time_ms: u64, position: Point) -> Option<TapEvent> {
        assert_eq!(detector.on_press(time_ms, position), None);
        detector.on_release(time_ms + 50, position)
    }

    #[test]
    fn single_tap_confirmed_after_timeout() {
        let mut detector = TapDetector::default();
        let position = Point::new(40.0, 40.0);
        assert_eq!(tap(&mut detector, 0, position), None);
        assert!(detector.has_pending_tap());
        assert_eq!(detector.poll(200), None);
        assert_eq!(detector.poll(400), Some(TapEvent::SingleTap(position)));
        assert_eq!(detector.poll(500), None);
    }

    #[test]
    fn second_tap_in_time_is_double_tap() {
        let mut detector = TapDetector::default();
        let first = Point::new(100.0, 100.0);
        let second = Point::new(120.0, 90.0);
        assert_eq!(tap(&mut detector, 0, first), None);
        assert_eq!(
            tap(&mut detector, 200, second),
            Some(TapEvent::DoubleTap(second))
        );
        assert!(!detector.has_pending_tap());
        assert_eq!(detector.poll(1_000), None);
    }

    #[test]
    fn far_second_tap_confirms_first_as_single() {
        let mut detector = TapDetector::default();
        let first = Point::new(0.0, 0.0);
        let second = Point::new(300.0, 0.0);
        tap(&mut detector, 0, first);
        assert_eq!(
            detector.on_press(100, second),
            Some(TapEvent::SingleTap(first))
        );
        assert_eq!(detector.on_release(150, second), None);
        assert!(detector.has_pending_tap());
    }

    #[test]
    fn late_second_tap_is_not_double() {
        let mut detector = TapDetector::default();
        let position = Point::new(10.0, 10.0);
        tap(&mut detector, 0, position);
        assert_eq!(
            detector.on_press(1_000, position),
            Some(TapEvent::SingleTap(position))
        );
        assert_eq!(detector.on_release(1_050, position), None);
    }

    #[test]
    fn cancelled_press_reports_nothing() {
        let mut detector = TapDetector::default();
        detector.on_press(0, Point::ZERO);
        detector.cancel();
        assert_eq!(detector.on_release(10, Point::ZERO), None);
        assert_eq!(detector.poll(1_000), None);
    }
}
