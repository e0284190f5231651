use crate::runtime::RuntimeHandle;
use crate::FrameCallbackId;

/// Entry point for per-frame work.
///
/// Every callback is one-shot; an animation that wants to keep running
/// registers again from inside its callback.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let mut callback_opt = Some(callback);
        let runtime = self.runtime.clone();
        match runtime.register_frame_callback(move |time| {
            if let Some(callback) = callback_opt.take() {
                callback(time);
            }
        }) {
            Some(id) => FrameCallbackRegistration::new(runtime, id),
            None => FrameCallbackRegistration::inactive(runtime),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("alive", &self.runtime.is_alive())
            .finish()
    }
}

/// Keeps a frame callback registered. Dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    /// Whether this registration refers to a live runtime.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl std::fmt::Debug for FrameCallbackRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCallbackRegistration")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Runtime;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn cancelled_callback_never_runs() {
        let runtime = Runtime::default();
        let handle = runtime.handle();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        let registration = runtime.frame_clock().with_frame_nanos(move |_| flag.set(true));
        assert!(registration.is_active());
        registration.cancel();
        handle.drain_frame_callbacks(16_000_000);

        assert!(!fired.get());
        assert!(!runtime.needs_frame());
    }

    #[test]
    fn dropping_registration_cancels_callback() {
        let runtime = Runtime::default();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        drop(runtime.frame_clock().with_frame_nanos(move |_| flag.set(true)));
        runtime.handle().drain_frame_callbacks(16_000_000);

        assert!(!fired.get());
    }

    #[test]
    fn millis_callback_receives_converted_time() {
        let runtime = Runtime::default();
        let seen = Rc::new(Cell::new(0));
        let slot = Rc::clone(&seen);

        let _registration = runtime
            .frame_clock()
            .with_frame_millis(move |millis| slot.set(millis));
        runtime.handle().drain_frame_callbacks(48_500_000);

        assert_eq!(seen.get(), 48);
    }
}
