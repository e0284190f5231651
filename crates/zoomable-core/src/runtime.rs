use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<FrameCallbackId>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        // Callbacks registered while draining run on the next frame.
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        log::trace!(
            "draining {} frame callbacks at {}ns",
            pending.len(),
            frame_time_nanos
        );
        for callback in pending {
            callback(frame_time_nanos);
        }
        if !self.has_frame_callbacks() {
            self.needs_frame.set(false);
        }
    }
}

/// Owner of the frame callback queue.
///
/// There is one runtime per UI thread. Everything that animates holds a
/// [`RuntimeHandle`] (a weak reference), so dropping the runtime silently
/// stops all animations.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn set_needs_frame(&self, value: bool) {
        self.inner.needs_frame.set(value);
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Arc::new(DefaultScheduler))
    }
}

/// Scheduler for hosts that poll [`Runtime::needs_frame`] instead of being
/// notified.
#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.schedule();
        }
    }

    pub(crate) fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub(crate) fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Runs every frame callback registered before this call.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn needs_frame(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingScheduler {
        requests: AtomicUsize,
    }

    impl RuntimeScheduler for CountingScheduler {
        fn schedule_frame(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registering_a_callback_requests_a_frame() {
        let scheduler = Arc::new(CountingScheduler::default());
        let runtime = Runtime::new(scheduler.clone());
        let handle = runtime.handle();

        assert!(!runtime.needs_frame());
        let _registration = handle.frame_clock().with_frame_nanos(|_| {});
        assert!(runtime.needs_frame());
        assert_eq!(scheduler.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callbacks_registered_during_drain_run_next_frame() {
        let runtime = Runtime::default();
        let handle = runtime.handle();
        let frames = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::new(RefCell::new(Vec::new()));

        let clock = handle.frame_clock();
        let frames_outer = Rc::clone(&frames);
        let keep_inner = Rc::clone(&keep);
        let clock_inner = clock.clone();
        let registration = clock.with_frame_nanos(move |time| {
            frames_outer.borrow_mut().push(time);
            let frames_inner = Rc::clone(&frames_outer);
            let next = clock_inner.with_frame_nanos(move |time| {
                frames_inner.borrow_mut().push(time);
            });
            keep_inner.borrow_mut().push(next);
        });

        handle.drain_frame_callbacks(10);
        assert_eq!(frames.borrow().as_slice(), &[10]);
        handle.drain_frame_callbacks(20);
        assert_eq!(frames.borrow().as_slice(), &[10, 20]);
        assert!(!runtime.needs_frame());
        drop(registration);
    }

    #[test]
    fn dropped_runtime_makes_handles_inert() {
        let runtime = Runtime::default();
        let handle = runtime.handle();
        drop(runtime);

        assert!(!handle.is_alive());
        assert!(handle.register_frame_callback(|_| {}).is_none());
        handle.drain_frame_callbacks(0);
    }
}
