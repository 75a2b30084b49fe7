//! Scoped timing
//!
//! A [`TimerGuard`] starts its timer when created and stops it when dropped,
//! so the stop message is emitted on every exit path: normal completion,
//! early return, `?`, or a panic unwinding through the scope.

use crate::error::{Result, TimerError};
use crate::timer::Timer;
use std::time::Duration;
use tracing::warn;

/// Stops the borrowed timer exactly once, on `finish` or on drop
#[must_use = "the timer stops as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TimerGuard<'a> {
    timer: Option<&'a mut Timer>,
}

impl TimerGuard<'_> {
    /// Running time since the guard started the timer
    pub fn read(&self) -> Result<Duration> {
        self.timer.as_deref().map_or(Err(TimerError::NotStarted), Timer::read)
    }

    /// Stop now and get the result instead of leaving it to drop
    pub fn finish(mut self) -> Result<Duration> {
        self.timer.take().map_or(Err(TimerError::NotStarted), Timer::stop)
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            if let Err(err) = timer.stop() {
                warn!(category = err.category(), error = %err, "scoped timer failed to stop");
            }
        }
    }
}

impl Timer {
    /// Start the timer and return a guard that stops it when dropped
    pub fn guard(&mut self) -> Result<TimerGuard<'_>> {
        self.start()?;
        Ok(TimerGuard { timer: Some(self) })
    }

    /// Time a closure.
    ///
    /// If `f` panics the timer is still stopped (and its message printed)
    /// while the panic unwinds.
    pub fn measure<F, R>(&mut self, f: F) -> Result<(R, Duration)>
    where
        F: FnOnce() -> R,
    {
        let guard = self.guard()?;
        let value = f();
        let elapsed = guard.finish()?;
        Ok((value, elapsed))
    }
}
