//! Elapsed-time measurement with a stopwatch object and `tic`/`toc` functions.
//!
//! ```no_run
//! use tictoc_core::{Timer, tic, toc};
//!
//! # fn main() -> Result<(), tictoc_core::TimerError> {
//! // Object interface
//! let mut timer = Timer::new();
//! timer.start()?;
//! let elapsed = timer.stop()?; // prints "Elapsed time is 0.000012 seconds."
//! # let _ = elapsed;
//!
//! // Scoped: stops (and prints) when the guard goes out of scope
//! let mut timer = Timer::with_format("{elapsed:7.3f}\n");
//! {
//!     let _guard = timer.guard()?;
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//!
//! // Procedural interface backed by one process-wide timer
//! tic()?;
//! toc()?;
//! # Ok(())
//! # }
//! ```
//!
//! Timers can wait on a [`Barrier`] before each clock read so that several
//! participants start and stop together.

/// Synchronisation barriers awaited before clock reads
pub mod barrier;
/// Monotonic time sources
pub mod clock;
/// Timer configuration from code, YAML or the environment
pub mod config;
/// Error types
pub mod error;
/// Process-wide timer and the `tic`/`toc` functions
pub mod global;
/// Scoped timing guards
pub mod scope;
/// Stop message templates
pub mod template;
/// Output capture for tests
pub mod test_utils;
/// The stopwatch
pub mod timer;

pub use barrier::{Barrier, FnBarrier, ThreadBarrier};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::TimerConfig;
pub use error::{FormatError, Result, TimerError};
pub use global::{tic, toc};
pub use scope::TimerGuard;
pub use template::{DEFAULT_TEMPLATE, FormatTemplate};
pub use timer::{Timer, TimerBuilder};
