//! Supervisor conformance tests: error aggregation, drain discipline and
//! handle validity under real concurrency.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use common::init_test_logging;
use proptest::prelude::*;
use warden::{Context, Supervisor, TaskError};

#[test]
fn the_single_failing_child_owns_the_error() {
    init_test_logging();
    let ctx = Context::background();
    let sup = Supervisor::new();
    let mut handles = Vec::new();
    for k in 0u64..8 {
        sup.start();
        let worker = sup.clone();
        handles.push(thread::spawn(move || {
            thread::sleep(Duration::from_millis(10 * k));
            if k == 3 {
                worker.stop(Err(TaskError::failed("child-3")));
            } else {
                worker.stop(Ok(()));
            }
        }));
    }
    assert_eq!(sup.wait(&ctx), Err(TaskError::failed("child-3")));
    assert_eq!(sup.err(&ctx), Some(TaskError::failed("child-3")));
    for handle in handles {
        handle.join().expect("child panicked");
    }
}

#[test]
fn concurrent_failures_elect_exactly_one_winner() {
    init_test_logging();
    let ctx = Context::background();
    let sup = Supervisor::new();
    let gate = Arc::new(Barrier::new(8));
    let mut handles = Vec::new();
    for k in 0..8 {
        sup.start();
        let worker = sup.clone();
        let gate = Arc::clone(&gate);
        handles.push(thread::spawn(move || {
            gate.wait();
            worker.stop(Err(TaskError::failed(format!("child-{k}"))));
        }));
    }
    let winner = sup.wait(&ctx).expect_err("every child failed");
    // Later-completing siblings never displace the winner.
    for _ in 0..4 {
        assert_eq!(sup.err(&ctx), Some(winner.clone()));
    }
    assert!(sup.context().is_cancelled());
    for handle in handles {
        handle.join().expect("child panicked");
    }
}

#[test]
fn wait_returns_only_after_every_start_is_balanced() {
    init_test_logging();
    let ctx = Context::background();
    let sup = Supervisor::new();
    let mut handles = Vec::new();
    for k in 0u64..16 {
        sup.start();
        let worker = sup.clone();
        handles.push(thread::spawn(move || {
            thread::sleep(Duration::from_millis(20 + 5 * k));
            worker.stop(Ok(()));
        }));
    }
    let begin = Instant::now();
    assert!(sup.wait(&ctx).is_ok());
    // The slowest child sleeps 95ms; wait cannot return before it stops.
    assert!(begin.elapsed() >= Duration::from_millis(95));
    for handle in handles {
        handle.join().expect("child panicked");
    }
}

#[test]
fn close_on_a_handle_that_was_never_created_returns_normally() {
    init_test_logging();
    let ctx = Context::background();
    Supervisor::default().close(&ctx);
}

proptest! {
    #[test]
    fn the_first_error_in_any_balanced_sequence_wins(
        outcomes in proptest::collection::vec(proptest::option::of("[a-z]{1,8}"), 0..32)
    ) {
        let ctx = Context::background();
        let sup = Supervisor::new();
        for outcome in &outcomes {
            sup.start();
            match outcome {
                Some(message) => sup.stop(Err(TaskError::failed(message.clone()))),
                None => sup.stop(Ok(())),
            }
        }
        let expected = outcomes.iter().flatten().next();
        match (sup.wait(&ctx), expected) {
            (Ok(()), None) => {}
            (Err(err), Some(message)) => prop_assert_eq!(err.message(), message),
            (got, want) => prop_assert!(false, "wait returned {:?}, wanted {:?}", got, want),
        }
    }
}
