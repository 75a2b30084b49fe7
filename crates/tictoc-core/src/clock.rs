//! Monotonic time sources
//!
//! A `Clock` hands out readings relative to an arbitrary origin. Only the
//! difference between two readings of the same clock is meaningful.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A monotonic time source
pub trait Clock: Send {
    /// Current reading, relative to the clock's origin
    fn now(&self) -> Duration;
}

/// Process monotonic clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and hand
/// another to the timer under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    reading: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock whose first reading is `secs` seconds
    pub fn starting_at_secs(secs: f64) -> Self {
        let clock = Self::new();
        clock.set_secs(secs);
        clock
    }

    pub fn set(&self, reading: Duration) {
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner) = reading;
    }

    pub fn set_secs(&self, secs: f64) {
        self.set(Duration::from_secs_f64(secs));
    }

    pub fn advance(&self, by: Duration) {
        let mut reading = self.reading.lock().unwrap_or_else(PoisonError::into_inner);
        *reading += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
