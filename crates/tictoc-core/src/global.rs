//! Process-wide timer behind the `tic`/`toc` functions
//!
//! There is exactly one global timer. It is created on first use from
//! [`TimerConfig::from_env`] and lives until the process exits. There is no
//! nesting: a second `tic` before `toc` simply moves the start point.
//!
//! The timer sits behind a mutex so it can live in a `static`, but it is not
//! meant to be shared between concurrently timing threads; interleaved
//! `tic`/`toc` calls from several threads measure nothing useful.

use crate::config::TimerConfig;
use crate::error::Result;
use crate::timer::Timer;
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::Duration;

static GLOBAL_TIMER: LazyLock<Mutex<Timer>> =
    LazyLock::new(|| Mutex::new(Timer::builder().config(&TimerConfig::from_env()).build()));

/// Start (or restart) the process-wide timer
pub fn tic() -> Result<()> {
    with_timer(Timer::start)
}

/// Stop the process-wide timer, print its message and return the elapsed time.
///
/// Fails with [`crate::TimerError::NotStarted`] if `tic` was never called.
pub fn toc() -> Result<Duration> {
    with_timer(Timer::stop)
}

/// Clear the process-wide timer's readings
pub fn reset() {
    with_timer(Timer::reset);
}

/// Run `f` with exclusive access to the process-wide timer.
///
/// The timer's lock is held while `f` runs and it is not reentrant: calling
/// [`tic`], [`toc`], [`reset`], [`install`] or `with_timer` from inside `f`
/// deadlocks. Use the `&mut Timer` argument instead.
pub fn with_timer<R>(f: impl FnOnce(&mut Timer) -> R) -> R {
    // A panic while the lock was held cannot leave the timer inconsistent.
    let mut timer = GLOBAL_TIMER.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut *timer)
}

/// Replace the process-wide timer, returning the previous one
pub fn install(timer: Timer) -> Timer {
    with_timer(|current| std::mem::replace(current, timer))
}
