//! Platform abstraction traits for runtime services.
//!
//! These traits allow the runtime to delegate scheduling and clock
//! responsibilities to the host platform, enabling integration with
//! different environments without depending directly on `std` APIs.

use web_time::Instant;

/// Schedules work for the runtime.
///
/// Implementations are responsible for asking the host to render another
/// frame. They must be safe to use from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;

    /// Returns the number of nanoseconds elapsed since `since`.
    fn elapsed_nanos(&self, since: Self::Instant) -> u64;
}

/// Monotonic clock backed by `web_time::Instant`, usable on native and wasm.
///
/// Hosts use it to produce both pointer `uptime_ms` values and frame
/// timestamps from the same origin.
#[derive(Clone, Copy, Debug)]
pub struct WebClock {
    origin: Instant,
}

impl WebClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since this clock was created.
    pub fn uptime_millis(&self) -> u64 {
        self.elapsed_millis(self.origin)
    }

    /// Nanoseconds since this clock was created.
    pub fn uptime_nanos(&self) -> u64 {
        self.elapsed_nanos(self.origin)
    }
}

impl Default for WebClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WebClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Instant) -> u64 {
        Instant::now().duration_since(since).as_millis() as u64
    }

    fn elapsed_nanos(&self, since: Instant) -> u64 {
        Instant::now().duration_since(since).as_nanos() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_clock_is_monotonic() {
        let clock = WebClock::new();
        let first = clock.uptime_nanos();
        let second = clock.uptime_nanos();
        assert!(second >= first);
        assert!(clock.uptime_millis() <= second / 1_000_000 + 1);
    }
}
