/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate lib_corgi;
extern crate serde_json;

use std::sync::Arc;
use std::time::{Duration, Instant};

use lib_corgi::corgi::algorithms::connected_components::ConnectedComponents;
use lib_corgi::corgi::error::BenchError;
use lib_corgi::corgi::harness::{
    EvaluationHarness, EvaluationRecord, FailurePolicy, RunStatus,
};
use lib_corgi::corgi::modularity::WeightedModularity;
use lib_corgi::corgi::partition::Partition;
use lib_corgi::corgi::registry::AlgorithmRegistry;
use lib_corgi::corgi::report::EvaluationReport;
use lib_corgi::corgi::test_utils::{
    gen_community, gen_two_triangle_graph, FixedPartition, PanickyAlgorithm, SleepyAlgorithm,
};

fn gen_split_partition() -> Partition {
    Partition::from_communities(vec![gen_community(&[0, 1, 2]), gen_community(&[3, 4, 5])])
}

#[test]
fn test_records_follow_registration_order() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    registry
        .register(
            "split",
            Arc::new(FixedPartition {
                partition: gen_split_partition(),
            }),
        )
        .unwrap();
    registry
        .register("components", Arc::new(ConnectedComponents::new()))
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_secs(10),
        false,
        FailurePolicy::SkipAndContinue,
    )
    .unwrap();
    let report = harness.evaluate(&registry).unwrap();
    let names: Vec<&str> = report.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["split", "components"]);
}

#[test]
fn test_completed_records_carry_results() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    registry
        .register(
            "split",
            Arc::new(FixedPartition {
                partition: gen_split_partition(),
            }),
        )
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_secs(10),
        false,
        FailurePolicy::Abort,
    )
    .unwrap();
    let report = harness.evaluate(&registry).unwrap();
    let record = report.get("split").unwrap();
    assert!(record.is_completed());
    assert!(record.runtime.unwrap() >= 0.0);
    // Two triangles of weight 3.0 each, one 0.1 bridge: m = 6.1 and each
    // community holds half the strength.
    let expected = 2.0 * (3.0 / 6.1 - 0.25);
    assert!((record.modularity.unwrap() - expected).abs() < 1e-12);
    assert_eq!(record.partition.as_ref().unwrap(), &gen_split_partition());
}

#[test]
fn test_timeout_yields_null_record_and_continues() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    registry
        .register(
            "sleepy",
            Arc::new(SleepyAlgorithm {
                duration: Duration::from_secs(5),
            }),
        )
        .unwrap();
    registry
        .register("components", Arc::new(ConnectedComponents::new()))
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_millis(100),
        false,
        FailurePolicy::SkipAndContinue,
    )
    .unwrap();
    let start = Instant::now();
    let report = harness.evaluate(&registry).unwrap();
    assert!(start.elapsed() < Duration::from_secs(3));
    let sleepy = report.get("sleepy").unwrap();
    assert!(sleepy.is_timed_out());
    assert_eq!(sleepy.runtime, None);
    assert_eq!(sleepy.modularity, None);
    assert!(sleepy.partition.is_none());
    // The bridge joins the two triangles into a single component.
    let components = report.get("components").unwrap();
    assert!(components.is_completed());
    assert_eq!(components.partition.as_ref().unwrap().num_communities(), 1);
}

#[test]
fn test_timeouts_are_recorded_even_under_abort_policy() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    registry
        .register(
            "sleepy",
            Arc::new(SleepyAlgorithm {
                duration: Duration::from_secs(5),
            }),
        )
        .unwrap();
    registry
        .register("components", Arc::new(ConnectedComponents::new()))
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_millis(100),
        false,
        FailurePolicy::Abort,
    )
    .unwrap();
    let report = harness.evaluate(&registry).unwrap();
    assert_eq!(report.len(), 2);
    assert!(report.get("sleepy").unwrap().is_timed_out());
    assert!(report.get("components").unwrap().is_completed());
}

#[test]
fn test_panic_is_recorded_under_skip_policy() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    registry
        .register("panicky", Arc::new(PanickyAlgorithm {}))
        .unwrap();
    registry
        .register("components", Arc::new(ConnectedComponents::new()))
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_secs(10),
        false,
        FailurePolicy::SkipAndContinue,
    )
    .unwrap();
    let report = harness.evaluate(&registry).unwrap();
    match &report.get("panicky").unwrap().status {
        RunStatus::Failed(reason) => assert!(reason.contains("deliberate test panic")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert!(report.get("components").unwrap().is_completed());
}

#[test]
fn test_panic_aborts_under_abort_policy() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    registry
        .register("panicky", Arc::new(PanickyAlgorithm {}))
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_secs(10),
        false,
        FailurePolicy::Abort,
    )
    .unwrap();
    match harness.evaluate(&registry) {
        Err(BenchError::AlgorithmPanic(message)) => {
            assert!(message.contains("deliberate test panic"))
        }
        other => panic!("Expected AlgorithmPanic, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unscorable_partition_is_a_failure() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let mut registry = AlgorithmRegistry::new();
    // Covers only one triangle, so scoring must reject it.
    registry
        .register(
            "partial",
            Arc::new(FixedPartition {
                partition: Partition::from_communities(vec![gen_community(&[0, 1, 2])]),
            }),
        )
        .unwrap();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_secs(10),
        false,
        FailurePolicy::SkipAndContinue,
    )
    .unwrap();
    let report = harness.evaluate(&registry).unwrap();
    match &report.get("partial").unwrap().status {
        RunStatus::Failed(reason) => assert!(reason.contains("covers")),
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[test]
fn test_empty_registry_gives_empty_report() {
    let graph = gen_two_triangle_graph();
    let scorer = WeightedModularity::new();
    let registry = AlgorithmRegistry::new();
    let harness = EvaluationHarness::new(
        &graph,
        &scorer,
        Duration::from_secs(10),
        false,
        FailurePolicy::Abort,
    )
    .unwrap();
    let report = harness.evaluate(&registry).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_registry_rejects_duplicate_names() {
    let mut registry = AlgorithmRegistry::new();
    registry
        .register("components", Arc::new(ConnectedComponents::new()))
        .unwrap();
    let result = registry.register("components", Arc::new(ConnectedComponents::new()));
    match result {
        Err(BenchError::InvalidArgument(message)) => assert!(message.contains("components")),
        other => panic!("Expected InvalidArgument, got {:?}", other),
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_report_ranks_unscored_runs_last() {
    let mut report = EvaluationReport::new();
    report.push("low", EvaluationRecord::completed(0.1, 0.2, Partition::new()));
    report.push("sleepy", EvaluationRecord::timed_out());
    report.push(
        "high",
        EvaluationRecord::completed(0.1, 0.7, Partition::new()),
    );
    report.push("broken", EvaluationRecord::failed("boom".to_owned()));
    let ranked: Vec<&str> = report
        .ranked_by_modularity()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(ranked, vec!["high", "low", "sleepy", "broken"]);
}

#[test]
fn test_json_rows_mark_missing_results_null() {
    let mut report = EvaluationReport::new();
    report.push(
        "split",
        EvaluationRecord::completed(0.25, 0.5, gen_split_partition()),
    );
    report.push("sleepy", EvaluationRecord::timed_out());
    let rows = report.to_json_rows();
    assert_eq!(rows.len(), 2);
    let completed: serde_json::Value = serde_json::from_str(&rows[0]).unwrap();
    assert_eq!(completed["algorithm"], "split");
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["num_communities"], 2);
    assert!((completed["modularity"].as_f64().unwrap() - 0.5).abs() < 1e-12);
    let timed_out: serde_json::Value = serde_json::from_str(&rows[1]).unwrap();
    assert_eq!(timed_out["status"], "timed_out");
    assert!(timed_out["runtime"].is_null());
    assert!(timed_out["modularity"].is_null());
    assert!(timed_out["num_communities"].is_null());
}

#[test]
fn test_rendered_table_lists_every_algorithm() {
    let mut report = EvaluationReport::new();
    report.push(
        "split",
        EvaluationRecord::completed(0.25, 0.5, gen_split_partition()),
    );
    report.push("sleepy", EvaluationRecord::timed_out());
    let table = report.render_table();
    assert!(table.contains("algorithm"));
    assert!(table.contains("split"));
    assert!(table.contains("sleepy"));
    assert!(table.contains("timed_out"));
}
