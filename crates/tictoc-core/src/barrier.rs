//! Synchronisation barriers invoked before each clock read
//!
//! A barrier lets several participants (threads, or processes in a
//! distributed job) start and stop their timers at roughly the same moment.
//! The timer's only contract with a barrier is: call `wait`, block until it
//! returns, and pass any error straight back to the caller.

use std::fmt;
use std::sync::Arc;

/// A rendezvous point shared by all timing participants
pub trait Barrier: Send {
    /// Block until every participant has arrived
    fn wait(&mut self) -> anyhow::Result<()>;
}

/// Adapts a closure into a `Barrier`
pub struct FnBarrier<F> {
    f: F,
}

impl<F> FnBarrier<F>
where
    F: FnMut() -> anyhow::Result<()> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Barrier for FnBarrier<F>
where
    F: FnMut() -> anyhow::Result<()> + Send,
{
    fn wait(&mut self) -> anyhow::Result<()> {
        (self.f)()
    }
}

impl<F> fmt::Debug for FnBarrier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBarrier").finish_non_exhaustive()
    }
}

/// Barrier for threads within one process, backed by `std::sync::Barrier`
#[derive(Debug, Clone)]
pub struct ThreadBarrier {
    inner: Arc<std::sync::Barrier>,
}

impl ThreadBarrier {
    /// Create a barrier for `participants` threads; clone it once per thread
    pub fn new(participants: usize) -> Self {
        Self { inner: Arc::new(std::sync::Barrier::new(participants)) }
    }
}

impl From<Arc<std::sync::Barrier>> for ThreadBarrier {
    fn from(inner: Arc<std::sync::Barrier>) -> Self {
        Self { inner }
    }
}

impl Barrier for ThreadBarrier {
    fn wait(&mut self) -> anyhow::Result<()> {
        self.inner.wait();
        Ok(())
    }
}
