//! Timer lifecycle test suite
//!
//! Exercises start/stop pairs against a manual clock, message rendering,
//! barrier synchronisation across threads, and the properties that must
//! hold for any simulated duration.

use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use tictoc_core::test_utils::SharedBuffer;
use tictoc_core::{Barrier, ManualClock, ThreadBarrier, Timer, TimerError};

fn timer_with(template: &str) -> (Timer, ManualClock, SharedBuffer) {
    let clock = ManualClock::new();
    let output = SharedBuffer::new();
    let timer =
        Timer::builder().format(template).clock(clock.clone()).output(output.clone()).build();
    (timer, clock, output)
}

/// Clock reads 10.0 at start and 14.619975 at stop
#[test]
fn test_reports_elapsed_with_default_message() {
    let clock = ManualClock::starting_at_secs(10.0);
    let output = SharedBuffer::new();
    let mut timer = Timer::builder().clock(clock.clone()).output(output.clone()).build();

    timer.start().unwrap();
    clock.set_secs(14.619975);
    let elapsed = timer.stop().unwrap();

    assert!((elapsed.as_secs_f64() - 4.619975).abs() < 1e-6);
    assert_eq!(output.contents(), "Elapsed time is 4.619975 seconds.\n");
}

/// Custom template with width and precision
#[test]
fn test_custom_template_precision() {
    let (mut timer, clock, output) = timer_with("{elapsed:7.3f}\n");

    timer.start().unwrap();
    clock.advance(Duration::from_secs_f64(2.002168));
    timer.stop().unwrap();

    assert_eq!(output.contents(), "  2.002\n");
}

/// Sequential pairs do not accumulate
#[test]
fn test_sequential_pairs_are_independent() {
    let (mut timer, clock, output) = timer_with("{elapsed:.1f}\n");

    timer.start().unwrap();
    clock.advance(Duration::from_secs(2));
    let first = timer.stop().unwrap();

    timer.start().unwrap();
    clock.advance(Duration::from_secs(5));
    let second = timer.stop().unwrap();

    assert_eq!(first, Duration::from_secs(2));
    assert_eq!(second, Duration::from_secs(5));
    assert_eq!(output.contents(), "2.0\n5.0\n");
}

#[test]
fn test_stop_before_start_is_an_error() {
    let (mut timer, _clock, output) = timer_with("{elapsed:f}\n");

    let err = timer.stop().unwrap_err();
    assert!(matches!(err, TimerError::NotStarted));
    assert_eq!(err.to_string(), "Timer not yet started.");
    assert!(output.contents().is_empty());
}

/// Every participant waits at the barrier before both clock reads
#[test]
fn test_thread_barrier_synchronises_participants() {
    const PARTICIPANTS: usize = 4;
    let barrier = ThreadBarrier::new(PARTICIPANTS);
    let arrivals = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..PARTICIPANTS)
        .map(|rank| {
            let barrier = barrier.clone();
            let arrivals = Arc::clone(&arrivals);
            thread::spawn(move || -> tictoc_core::Result<Duration> {
                let counted = CountedBarrier { inner: barrier, arrivals };
                let mut timer = Timer::builder().silent().barrier(counted).build();
                timer.start()?;
                thread::sleep(Duration::from_millis(5 * rank as u64));
                timer.stop()
            })
        })
        .collect();

    for handle in handles {
        let elapsed = handle.join().unwrap().unwrap();
        assert!(elapsed < Duration::from_secs(30));
    }
    assert_eq!(arrivals.load(Ordering::SeqCst), PARTICIPANTS * 2);
}

struct CountedBarrier {
    inner: ThreadBarrier,
    arrivals: Arc<AtomicUsize>,
}

impl Barrier for CountedBarrier {
    fn wait(&mut self) -> anyhow::Result<()> {
        self.arrivals.fetch_add(1, Ordering::SeqCst);
        self.inner.wait()
    }
}

/// A failing barrier on stop leaves the start reading in place
#[test]
fn test_barrier_failure_on_stop_propagates() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut timer = Timer::builder()
        .silent()
        .clock(ManualClock::new())
        .barrier_fn(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(())
            } else {
                Err(anyhow::anyhow!("peer process exited"))
            }
        })
        .build();

    timer.start().unwrap();
    let err = timer.stop().unwrap_err();

    assert_eq!(err.to_string(), "peer process exited");
    assert!(timer.is_started());
    assert!(!timer.is_ended());
}

/// Real clock sanity check
#[test]
fn test_monotonic_clock_measures_sleep() {
    let mut timer = Timer::builder().silent().build();
    timer.start().unwrap();
    thread::sleep(Duration::from_millis(20));
    let elapsed = timer.stop().unwrap();
    assert!(elapsed >= Duration::from_millis(20));
}

proptest! {
    #[test]
    fn prop_stop_reports_simulated_duration(
        origin_ms in 0u64..1_000_000,
        duration_ns in 0u64..10_000_000_000,
    ) {
        let (mut timer, clock, _output) = timer_with("");
        clock.set(Duration::from_millis(origin_ms));

        timer.start().unwrap();
        clock.advance(Duration::from_nanos(duration_ns));
        let elapsed = timer.stop().unwrap();

        prop_assert_eq!(elapsed, Duration::from_nanos(duration_ns));
        prop_assert_eq!(timer.elapsed(), Some(elapsed));
    }

    #[test]
    fn prop_restart_uses_latest_start(
        first_ms in 0u64..10_000,
        gap_ms in 0u64..10_000,
        run_ms in 0u64..10_000,
    ) {
        let (mut timer, clock, _output) = timer_with("");
        clock.set(Duration::from_millis(first_ms));
        timer.start().unwrap();
        clock.advance(Duration::from_millis(gap_ms));
        timer.start().unwrap();
        clock.advance(Duration::from_millis(run_ms));

        prop_assert_eq!(timer.stop().unwrap(), Duration::from_millis(run_ms));
    }

    #[test]
    fn prop_precision_is_exact(millis in 0u64..100_000_000, precision in 0usize..9) {
        let template = format!("{{elapsed:.{precision}f}}");
        let (mut timer, clock, output) = timer_with(&template);

        timer.start().unwrap();
        clock.advance(Duration::from_millis(millis));
        timer.stop().unwrap();

        let rendered = output.contents();
        let decimals = rendered.split_once('.').map_or(0, |(_, frac)| frac.len());
        prop_assert_eq!(decimals, precision);
    }
}
