/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::time::{Duration, Instant};

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::executor::{ExecutionOutcome, IsolatedExecutor};
use crate::corgi::modularity::QualityScorer;
use crate::corgi::partition::Partition;
use crate::corgi::registry::AlgorithmRegistry;
use crate::corgi::report::EvaluationReport;
use crate::corgi::similarity_graph::SimilarityGraph;

/// How a single algorithm run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    TimedOut,
    Failed(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::TimedOut => "timed_out",
            RunStatus::Failed(_) => "failed",
        }
    }
}

/// What to do when an algorithm crashes or its partition cannot be scored.
/// Timeouts are not failures; they are recorded and the harness moves on
/// regardless of policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    SkipAndContinue,
    Abort,
}

/// Everything recorded about one algorithm run. `runtime` is wall-clock
/// seconds around the isolated call. All three payload fields are `None`
/// when the run timed out or failed.
#[derive(Clone, Debug)]
pub struct EvaluationRecord {
    pub runtime: Option<f64>,
    pub modularity: Option<f64>,
    pub partition: Option<Partition>,
    pub status: RunStatus,
}

impl EvaluationRecord {
    pub fn completed(runtime: f64, modularity: f64, partition: Partition) -> Self {
        Self {
            runtime: Some(runtime),
            modularity: Some(modularity),
            partition: Some(partition),
            status: RunStatus::Completed,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            runtime: None,
            modularity: None,
            partition: None,
            status: RunStatus::TimedOut,
        }
    }

    pub fn failed(reason: String) -> Self {
        Self {
            runtime: None,
            modularity: None,
            partition: None,
            status: RunStatus::Failed(reason),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn is_timed_out(&self) -> bool {
        self.status == RunStatus::TimedOut
    }
}

/// Runs every registered algorithm against one graph, each inside a fresh
/// worker with a deadline, and scores whatever comes back. Algorithms run
/// one at a time in registration order, so they never compete for cores; a
/// timed-out run is recorded with null results and the harness proceeds to
/// the next algorithm.
pub struct EvaluationHarness<'a> {
    graph: &'a SimilarityGraph,
    scorer: &'a dyn QualityScorer,
    executor: IsolatedExecutor,
    verbose: bool,
    failure_policy: FailurePolicy,
}

impl<'a> EvaluationHarness<'a> {
    pub fn new(
        graph: &'a SimilarityGraph,
        scorer: &'a dyn QualityScorer,
        timeout: Duration,
        verbose: bool,
        failure_policy: FailurePolicy,
    ) -> BenchResult<Self> {
        Ok(Self {
            graph,
            scorer,
            executor: IsolatedExecutor::new(timeout)?,
            verbose,
            failure_policy,
        })
    }

    pub fn evaluate(&self, registry: &AlgorithmRegistry) -> BenchResult<EvaluationReport> {
        let mut report = EvaluationReport::new();
        for (name, algorithm) in registry.iter() {
            if self.verbose {
                eprintln!("Evaluating {}...", name);
            }
            // The worker gets its own copy of the graph; results come back
            // over the executor's channel.
            let graph = self.graph.clone();
            let algorithm = algorithm.clone();
            let start = Instant::now();
            let outcome = self.executor.execute(move || algorithm.detect(&graph));
            let elapsed = start.elapsed().as_secs_f64();
            match outcome {
                Ok(ExecutionOutcome::Completed(partition)) => {
                    match self.scorer.score(self.graph, &partition) {
                        Ok(modularity) => {
                            if self.verbose {
                                eprintln!(
                                    "{}: modularity {:.6} over {} communities in {:.3}s",
                                    name,
                                    modularity,
                                    partition.num_communities(),
                                    elapsed
                                );
                            }
                            report.push(
                                name,
                                EvaluationRecord::completed(elapsed, modularity, partition),
                            );
                        }
                        Err(error) => {
                            self.record_failure(&mut report, name, error)?;
                        }
                    }
                }
                Ok(ExecutionOutcome::TimedOut) => {
                    if self.verbose {
                        eprintln!("{} timed out after {:?}", name, self.executor.timeout());
                    }
                    report.push(name, EvaluationRecord::timed_out());
                }
                Err(error @ BenchError::AlgorithmPanic(_)) => {
                    self.record_failure(&mut report, name, error)?;
                }
                Err(error) => return Err(error),
            }
        }
        Ok(report)
    }

    fn record_failure(
        &self,
        report: &mut EvaluationReport,
        name: &str,
        error: BenchError,
    ) -> BenchResult<()> {
        match self.failure_policy {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::SkipAndContinue => {
                if self.verbose {
                    eprintln!("{} failed: {}", name, error);
                }
                report.push(name, EvaluationRecord::failed(error.to_string()));
                Ok(())
            }
        }
    }
}
