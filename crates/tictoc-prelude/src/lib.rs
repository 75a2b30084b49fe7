//! TicToc Prelude
//!
//! This crate re-exports the most frequently used public items from
//! `tictoc-core`. Applications can depend on `tictoc-prelude` and
//! `use tictoc_prelude::*` instead of maintaining long import lists.

#![deny(warnings)]
#![deny(missing_docs)]

// Stopwatch & procedural interface ------------------------------------------------------------

pub use tictoc_core::{Timer, TimerBuilder, TimerGuard, tic, toc};

// Configuration & synchronisation -------------------------------------------------------------

pub use tictoc_core::{Barrier, Clock, ThreadBarrier, TimerConfig};

// Errors --------------------------------------------------------------------------------------

pub use tictoc_core::{FormatError, TimerError};
