/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::any::Any;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError};

use crate::corgi::error::{BenchError, BenchResult};

/// Result of a single isolated run: either the task's value, or notice that
/// the deadline passed first.
#[derive(Debug, PartialEq)]
pub enum ExecutionOutcome<T> {
    Completed(T),
    TimedOut,
}

impl<T> ExecutionOutcome<T> {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, ExecutionOutcome::TimedOut)
    }

    pub fn into_completed(self) -> Option<T> {
        match self {
            ExecutionOutcome::Completed(value) => Some(value),
            ExecutionOutcome::TimedOut => None,
        }
    }
}

/// Runs tasks on single-use worker threads under a hard deadline. Every call
/// to `execute` starts a fresh worker and never reuses it, so state from one
/// run cannot leak into the next.
///
/// A worker that misses the deadline is abandoned: the result channel is
/// dropped and whatever the worker eventually produces goes nowhere. The
/// thread itself runs to completion detached in the background; the caller
/// regains control at the deadline regardless.
pub struct IsolatedExecutor {
    timeout: Duration,
}

impl IsolatedExecutor {
    pub fn new(timeout: Duration) -> BenchResult<Self> {
        if timeout.as_nanos() == 0 {
            return Err(BenchError::InvalidArgument(
                "Timeout must be positive".to_owned(),
            ));
        }
        Ok(Self { timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `task` on a fresh worker thread, waiting at most the configured
    /// timeout for its result. A panic inside the task surfaces as
    /// `BenchError::AlgorithmPanic` carrying the panic message; it is a
    /// distinct condition from a timeout, never conflated with one.
    pub fn execute<T, F>(&self, task: F) -> BenchResult<ExecutionOutcome<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = bounded(1);
        let worker = thread::Builder::new()
            .name("corgi-worker".to_owned())
            .spawn(move || {
                // The send fails only if the receiver already gave up.
                let _ = sender.send(task());
            })?;
        match receiver.recv_timeout(self.timeout) {
            Ok(value) => {
                let _ = worker.join();
                Ok(ExecutionOutcome::Completed(value))
            }
            Err(RecvTimeoutError::Timeout) => Ok(ExecutionOutcome::TimedOut),
            Err(RecvTimeoutError::Disconnected) => {
                // The sender dropped without sending: the task panicked.
                let message = match worker.join() {
                    Err(payload) => panic_message(payload),
                    Ok(()) => "worker exited without a result".to_owned(),
                };
                Err(BenchError::AlgorithmPanic(message))
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}
