use std::cell::Cell;
use std::rc::Rc;

use zoomable_ui_graphics::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
    /// Mouse wheel or two-finger trackpad scroll; carries a `scroll_delta`.
    Scroll,
}

/// A single pointer change, in viewport coordinates.
///
/// Multi-touch is delivered as one event per pointer; the detectors keep the
/// set of pointers that are currently down.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    /// Timestamp on the same monotonic clock as the frame clock.
    pub uptime_ms: u64,
    pub scroll_delta: Point,
    /// Shared via Rc<Cell> so consumption is visible across copies.
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(id: PointerId, kind: PointerEventKind, position: Point, uptime_ms: u64) -> Self {
        Self {
            id,
            kind,
            position,
            uptime_ms,
            scroll_delta: Point::ZERO,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn down(id: PointerId, position: Point, uptime_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Down, position, uptime_ms)
    }

    pub fn moved(id: PointerId, position: Point, uptime_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Move, position, uptime_ms)
    }

    pub fn up(id: PointerId, position: Point, uptime_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Up, position, uptime_ms)
    }

    pub fn cancel(id: PointerId, uptime_ms: u64) -> Self {
        Self::new(id, PointerEventKind::Cancel, Point::ZERO, uptime_ms)
    }

    pub fn scroll(position: Point, delta: Point, uptime_ms: u64) -> Self {
        let mut event = Self::new(0, PointerEventKind::Scroll, position, uptime_ms);
        event.scroll_delta = delta;
        event
    }

    /// Mark this event as consumed, so the parent container does not also
    /// act on it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Creates a copy with a new local position, sharing the consumption state.
    pub fn copy_with_local_position(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}
