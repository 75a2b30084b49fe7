//! Procedural interface test suite
//!
//! These tests share the process-wide timer, so they run serially.

use serial_test::serial;
use std::time::Duration;
use tictoc_core::test_utils::SharedBuffer;
use tictoc_core::{ManualClock, Timer, TimerError, global, tic, toc};

fn install_manual_timer(template: &str) -> (ManualClock, SharedBuffer) {
    let clock = ManualClock::new();
    let output = SharedBuffer::new();
    global::install(
        Timer::builder().format(template).clock(clock.clone()).output(output.clone()).build(),
    );
    (clock, output)
}

#[test]
#[serial]
fn test_toc_without_tic_fails() {
    install_manual_timer("{elapsed:f}\n");

    assert!(matches!(toc(), Err(TimerError::NotStarted)));
}

#[test]
#[serial]
fn test_tic_toc_reports_elapsed() {
    let (clock, output) = install_manual_timer("Elapsed time is {elapsed:f} seconds.\n");
    clock.set_secs(10.0);

    tic().unwrap();
    clock.set_secs(14.619975);
    let elapsed = toc().unwrap();

    assert!((elapsed.as_secs_f64() - 4.619975).abs() < 1e-6);
    assert_eq!(output.contents(), "Elapsed time is 4.619975 seconds.\n");
}

#[test]
#[serial]
fn test_second_tic_resets_start() {
    let (clock, _output) = install_manual_timer("");

    tic().unwrap();
    clock.advance(Duration::from_secs(4));
    tic().unwrap();
    clock.advance(Duration::from_secs(1));

    assert_eq!(toc().unwrap(), Duration::from_secs(1));
}

#[test]
#[serial]
fn test_pairs_do_not_accumulate() {
    let (clock, output) = install_manual_timer("{elapsed:.1f}\n");

    tic().unwrap();
    clock.advance(Duration::from_secs(3));
    toc().unwrap();

    tic().unwrap();
    clock.advance(Duration::from_secs(2));
    toc().unwrap();

    assert_eq!(output.contents(), "3.0\n2.0\n");
}

#[test]
#[serial]
fn test_global_state_is_inspectable() {
    let (clock, _output) = install_manual_timer("");

    tic().unwrap();
    clock.advance(Duration::from_millis(300));
    assert!(global::with_timer(|timer| timer.is_started() && !timer.is_ended()));
    assert_eq!(global::with_timer(|timer| timer.read().unwrap()), Duration::from_millis(300));

    toc().unwrap();
    assert_eq!(global::with_timer(|timer| timer.elapsed()), Some(Duration::from_millis(300)));

    global::reset();
    assert!(matches!(toc(), Err(TimerError::NotStarted)));
}

#[test]
#[serial]
fn test_default_global_timer_uses_real_clock() {
    global::install(Timer::builder().silent().build());

    tic().unwrap();
    std::thread::sleep(Duration::from_millis(5));
    assert!(toc().unwrap() >= Duration::from_millis(5));
}
