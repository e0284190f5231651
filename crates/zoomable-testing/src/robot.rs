//! Robot-style gesture driver.
//!
//! [`GestureRobot`] owns a virtual clock. Every pointer event it sends is
//! stamped with that clock, and every frame it pumps drains the runtime's
//! frame callbacks at the same instant, so gestures and the animations they
//! start interleave the way they do in a real event loop.
//!
//! # Example
//!
//! ```ignore
//! let runtime = Runtime::default();
//! let zoomable = Zoomable::new(ZoomableConfig::default(), runtime.frame_clock());
//! let mut robot = GestureRobot::new(&runtime, |event: &PointerEvent| {
//!     zoomable.on_pointer_event(event)
//! });
//!
//! robot.double_tap(Point::new(200.0, 200.0));
//! robot.wait_for_idle();
//! ```

use zoomable_core::{Runtime, RuntimeHandle};
use zoomable_foundation::{PointerEvent, PointerId};
use zoomable_ui_graphics::Point;

/// Frame interval of the virtual clock.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Upper bound on frames pumped by [`GestureRobot::wait_for_idle`].
const MAX_IDLE_FRAMES: usize = 5_000;

/// Anything that accepts pointer events.
pub trait PointerInput {
    type Outcome;

    fn dispatch(&mut self, event: &PointerEvent) -> Self::Outcome;
}

impl<F, O> PointerInput for F
where
    F: FnMut(&PointerEvent) -> O,
{
    type Outcome = O;

    fn dispatch(&mut self, event: &PointerEvent) -> O {
        self(event)
    }
}

pub struct GestureRobot<T: PointerInput> {
    runtime: RuntimeHandle,
    target: T,
    now_ms: u64,
}

impl<T: PointerInput> GestureRobot<T> {
    pub fn new(runtime: &Runtime, target: T) -> Self {
        Self {
            runtime: runtime.handle(),
            target,
            now_ms: 0,
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Moves the clock forward without rendering any frame.
    pub fn advance_time(&mut self, millis: u64) {
        self.now_ms += millis;
    }

    /// Renders one frame at the current time, then moves the clock forward
    /// by one frame interval.
    pub fn advance_frame(&mut self) {
        self.runtime.drain_frame_callbacks(self.now_ms * 1_000_000);
        self.now_ms += FRAME_INTERVAL_MS;
    }

    pub fn advance_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Renders frames until no frame callback is pending. Returns false if
    /// animations were still running after the frame limit.
    pub fn wait_for_idle(&mut self) -> bool {
        for _ in 0..MAX_IDLE_FRAMES {
            if !self.runtime.has_frame_callbacks() {
                return true;
            }
            self.advance_frame();
        }
        log::warn!("still animating after {MAX_IDLE_FRAMES} frames");
        false
    }

    pub fn send(&mut self, event: PointerEvent) -> T::Outcome {
        self.target.dispatch(&event)
    }

    pub fn touch_down(&mut self, id: PointerId, position: Point) -> T::Outcome {
        self.send(PointerEvent::down(id, position, self.now_ms))
    }

    pub fn touch_move(&mut self, id: PointerId, position: Point) -> T::Outcome {
        self.send(PointerEvent::moved(id, position, self.now_ms))
    }

    pub fn touch_up(&mut self, id: PointerId, position: Point) -> T::Outcome {
        self.send(PointerEvent::up(id, position, self.now_ms))
    }

    pub fn cancel(&mut self, id: PointerId) -> T::Outcome {
        self.send(PointerEvent::cancel(id, self.now_ms))
    }

    pub fn scroll(&mut self, position: Point, delta: Point) -> T::Outcome {
        self.send(PointerEvent::scroll(position, delta, self.now_ms))
    }

    /// Presses at `from`, moves to `to` in `steps` evenly timed moves over
    /// `duration_ms` rendering a frame after each, but does not release.
    pub fn drag_without_release(
        &mut self,
        id: PointerId,
        from: Point,
        to: Point,
        steps: usize,
        duration_ms: u64,
    ) -> Vec<T::Outcome> {
        let steps = steps.max(1);
        let step_ms = duration_ms / steps as u64;
        let mut outcomes = Vec::with_capacity(steps + 1);
        outcomes.push(self.touch_down(id, from));
        for step in 1..=steps {
            self.advance_time(step_ms);
            let t = step as f32 / steps as f32;
            outcomes.push(self.touch_move(id, from + (to - from) * t));
            self.runtime.drain_frame_callbacks(self.now_ms * 1_000_000);
        }
        outcomes
    }

    /// A complete single-pointer drag, released at `to` right after the last
    /// move.
    pub fn drag(
        &mut self,
        id: PointerId,
        from: Point,
        to: Point,
        steps: usize,
        duration_ms: u64,
    ) -> Vec<T::Outcome> {
        let mut outcomes = self.drag_without_release(id, from, to, steps, duration_ms);
        outcomes.push(self.touch_up(id, to));
        outcomes
    }

    /// Two pointers placed symmetrically around `center` along the x axis,
    /// moving from `start_span` to `end_span` apart.
    pub fn pinch(
        &mut self,
        center: Point,
        start_span: f32,
        end_span: f32,
        steps: usize,
        duration_ms: u64,
    ) -> Vec<T::Outcome> {
        const FIRST: PointerId = 1;
        const SECOND: PointerId = 2;

        let steps = steps.max(1);
        let step_ms = duration_ms / steps as u64;
        let half = |span: f32| Point::new(span / 2.0, 0.0);
        let mut outcomes = Vec::with_capacity(2 * steps + 4);

        outcomes.push(self.touch_down(FIRST, center - half(start_span)));
        outcomes.push(self.touch_down(SECOND, center + half(start_span)));
        let mut span = start_span;
        for step in 1..=steps {
            self.advance_time(step_ms);
            span = start_span + (end_span - start_span) * (step as f32 / steps as f32);
            outcomes.push(self.touch_move(FIRST, center - half(span)));
            outcomes.push(self.touch_move(SECOND, center + half(span)));
            self.runtime.drain_frame_callbacks(self.now_ms * 1_000_000);
        }
        outcomes.push(self.touch_up(FIRST, center - half(span)));
        outcomes.push(self.touch_up(SECOND, center + half(span)));
        outcomes
    }

    pub fn tap(&mut self, position: Point) -> Vec<T::Outcome> {
        let down = self.touch_down(1, position);
        self.advance_time(50);
        let up = self.touch_up(1, position);
        vec![down, up]
    }

    /// Two taps 100ms apart.
    pub fn double_tap(&mut self, position: Point) -> Vec<T::Outcome> {
        let mut outcomes = self.tap(position);
        self.advance_time(100);
        outcomes.extend(self.tap(position));
        outcomes
    }
}
