/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate lib_corgi;

use std::thread;
use std::time::{Duration, Instant};

use lib_corgi::corgi::error::{BenchError, BenchResult};
use lib_corgi::corgi::executor::{ExecutionOutcome, IsolatedExecutor};

#[test]
fn test_executor_returns_task_value() {
    let executor = IsolatedExecutor::new(Duration::from_secs(5)).unwrap();
    let outcome = executor.execute(|| 21 * 2).unwrap();
    assert_eq!(outcome.into_completed(), Some(42));
}

#[test]
fn test_executor_rejects_zero_timeout() {
    match IsolatedExecutor::new(Duration::from_secs(0)) {
        Err(BenchError::InvalidArgument(_)) => (),
        other => panic!("Expected InvalidArgument, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_executor_runs_task_on_fresh_worker_thread() {
    let executor = IsolatedExecutor::new(Duration::from_secs(5)).unwrap();
    let outcome = executor
        .execute(|| thread::current().name().map(|name| name.to_owned()))
        .unwrap();
    assert_eq!(
        outcome.into_completed(),
        Some(Some("corgi-worker".to_owned()))
    );
}

#[test]
fn test_executor_abandons_slow_task_at_deadline() {
    let executor = IsolatedExecutor::new(Duration::from_millis(50)).unwrap();
    let start = Instant::now();
    let outcome = executor
        .execute(|| {
            thread::sleep(Duration::from_secs(5));
            0
        })
        .unwrap();
    assert!(outcome.is_timed_out());
    // The caller gets control back near the deadline, not after the sleep.
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_executor_survives_abandoned_worker() {
    let executor = IsolatedExecutor::new(Duration::from_millis(50)).unwrap();
    let outcome = executor
        .execute(|| {
            thread::sleep(Duration::from_secs(5));
            0
        })
        .unwrap();
    assert!(outcome.is_timed_out());
    // The next run happens on a new worker and is unaffected.
    let next = executor.execute(|| "still alive").unwrap();
    assert_eq!(next.into_completed(), Some("still alive"));
}

#[test]
fn test_executor_reports_panic_as_crash() {
    let executor = IsolatedExecutor::new(Duration::from_secs(5)).unwrap();
    let result: BenchResult<ExecutionOutcome<i32>> =
        executor.execute(|| -> i32 { panic!("kaboom") });
    match result {
        Err(BenchError::AlgorithmPanic(message)) => assert!(message.contains("kaboom")),
        other => panic!("Expected AlgorithmPanic, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_executor_captures_formatted_panic_message() {
    let executor = IsolatedExecutor::new(Duration::from_secs(5)).unwrap();
    let result: BenchResult<ExecutionOutcome<i32>> =
        executor.execute(|| -> i32 { panic!("bad partition: {}", 7) });
    match result {
        Err(BenchError::AlgorithmPanic(message)) => assert_eq!(message, "bad partition: 7"),
        other => panic!("Expected AlgorithmPanic, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_panic_is_not_mistaken_for_timeout() {
    // Generous deadline: a crash must surface as an error, never as TimedOut.
    let executor = IsolatedExecutor::new(Duration::from_secs(60)).unwrap();
    let start = Instant::now();
    let result: BenchResult<ExecutionOutcome<i32>> =
        executor.execute(|| -> i32 { panic!("crash before deadline") });
    assert!(result.is_err());
    assert!(start.elapsed() < Duration::from_secs(5));
}
