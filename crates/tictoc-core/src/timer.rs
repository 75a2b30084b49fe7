//! The stopwatch itself
//!
//! A `Timer` records a start reading and a stop reading from its clock, and
//! on stop renders a message with the elapsed seconds to its output sink.
//! Each start/stop pair is independent: starting again discards any earlier
//! readings, and stopping always measures from the most recent start.

use crate::barrier::{Barrier, FnBarrier};
use crate::clock::{Clock, MonotonicClock};
use crate::config::TimerConfig;
use crate::error::{Result, TimerError};
use crate::template::{DEFAULT_TEMPLATE, FormatTemplate};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Stopwatch with optional barrier synchronisation and a configurable stop message
pub struct Timer {
    /// Clock reading taken by the most recent start
    start: Option<Duration>,
    /// Clock reading taken by the most recent stop after that start
    end: Option<Duration>,
    /// Message template rendered at stop; `None` disables the message
    template: Option<String>,
    barrier: Option<Box<dyn Barrier>>,
    clock: Box<dyn Clock>,
    output: Box<dyn Write + Send>,
}

impl Timer {
    /// Timer with the default message, no barrier, the monotonic clock and stdout
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Timer with a custom message template
    pub fn with_format(template: impl Into<String>) -> Self {
        Self::builder().format(template).build()
    }

    pub fn builder() -> TimerBuilder {
        TimerBuilder::default()
    }

    /// Start, or restart, the timer.
    ///
    /// Earlier readings are cleared first, then the barrier (if any) is
    /// awaited before the clock is read. When the barrier fails its error is
    /// returned and the timer is left unstarted.
    pub fn start(&mut self) -> Result<()> {
        self.reset();
        self.synchronize()?;
        let now = self.clock.now();
        self.start = Some(now);
        debug!(reading_secs = now.as_secs_f64(), "timer started");
        Ok(())
    }

    /// Stop the timer, print the message and return the elapsed time.
    ///
    /// Fails with [`TimerError::NotStarted`] if the timer was never started.
    /// The elapsed time is recorded before the message is rendered, so it
    /// stays available through [`Timer::elapsed`] even if rendering fails.
    pub fn stop(&mut self) -> Result<Duration> {
        let start = self.start.ok_or(TimerError::NotStarted)?;
        self.synchronize()?;

        let end = self.clock.now();
        self.end = Some(end);
        let elapsed = end.saturating_sub(start);
        debug!(elapsed_secs = elapsed.as_secs_f64(), "timer stopped");

        self.report(elapsed)?;
        Ok(elapsed)
    }

    /// Forget both readings
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.end.is_some()
    }

    /// Elapsed time recorded by the last stop, if the timer has been stopped
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }

    /// Recorded elapsed time if stopped, otherwise the running time since start
    pub fn read(&self) -> Result<Duration> {
        let start = self.start.ok_or(TimerError::NotStarted)?;
        let end = self.end.unwrap_or_else(|| self.clock.now());
        Ok(end.saturating_sub(start))
    }

    /// [`Timer::read`] in seconds
    pub fn elapsed_secs(&self) -> Result<f64> {
        self.read().map(|elapsed| elapsed.as_secs_f64())
    }

    /// The configured message template, `None` when the timer is silent
    pub fn format(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn has_barrier(&self) -> bool {
        self.barrier.is_some()
    }

    fn synchronize(&mut self) -> Result<()> {
        if let Some(barrier) = self.barrier.as_mut() {
            trace!("waiting on barrier");
            barrier.wait().map_err(TimerError::Barrier)?;
            trace!("barrier released");
        }
        Ok(())
    }

    fn report(&mut self, elapsed: Duration) -> Result<()> {
        let Some(source) = self.template.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(());
        };
        let message = FormatTemplate::parse(source)?.render(elapsed.as_secs_f64());
        self.output.write_all(message.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.read() {
            Ok(elapsed) => {
                let message = FormatTemplate::default().render(elapsed.as_secs_f64());
                f.write_str(message.trim_end_matches('\n'))
            }
            Err(err) => write!(f, "{err}"),
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("template", &self.template)
            .field("barrier", &self.barrier.is_some())
            .finish_non_exhaustive()
    }
}

/// Constructor-time configuration for a [`Timer`]
pub struct TimerBuilder {
    template: Option<String>,
    barrier: Option<Box<dyn Barrier>>,
    clock: Option<Box<dyn Clock>>,
    output: Option<Box<dyn Write + Send>>,
}

impl Default for TimerBuilder {
    fn default() -> Self {
        Self {
            template: Some(DEFAULT_TEMPLATE.to_string()),
            barrier: None,
            clock: None,
            output: None,
        }
    }
}

impl TimerBuilder {
    /// Message template rendered at stop, see [`crate::template`]
    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Do not print anything at stop
    pub fn silent(mut self) -> Self {
        self.template = None;
        self
    }

    /// Barrier awaited before every clock read
    pub fn barrier(mut self, barrier: impl Barrier + 'static) -> Self {
        self.barrier = Some(Box::new(barrier));
        self
    }

    /// Closure awaited before every clock read
    pub fn barrier_fn<F>(self, f: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.barrier(FnBarrier::new(f))
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Where the stop message goes; stdout by default
    pub fn output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Apply the message settings of a [`TimerConfig`]
    pub fn config(mut self, config: &TimerConfig) -> Self {
        self.template = config.template().map(str::to_string);
        self
    }

    pub fn build(self) -> Timer {
        Timer {
            start: None,
            end: None,
            template: self.template,
            barrier: self.barrier,
            clock: self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
            output: self.output.unwrap_or_else(|| Box::new(io::stdout())),
        }
    }
}

impl fmt::Debug for TimerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerBuilder")
            .field("template", &self.template)
            .field("barrier", &self.barrier.is_some())
            .finish_non_exhaustive()
    }
}
