/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

extern crate clap;
extern crate rand;
extern crate thiserror;

pub mod corgi;

pub use corgi::algorithms::connected_components::ConnectedComponents;
pub use corgi::algorithms::greedy_modularity::GreedyModularity;
pub use corgi::algorithms::label_propagation::LabelPropagation;
pub use corgi::error::{BenchError, BenchResult};
pub use corgi::executor::{ExecutionOutcome, IsolatedExecutor};
pub use corgi::harness::{EvaluationHarness, EvaluationRecord, FailurePolicy, RunStatus};
pub use corgi::id_types::{ItemId, UserId};
pub use corgi::input::Input;
pub use corgi::item_sets::{ItemSet, ItemSetMap};
pub use corgi::modularity::{QualityScorer, WeightedModularity};
pub use corgi::node::SimilarityNode;
pub use corgi::output::Output;
pub use corgi::partition::{Community, Partition};
pub use corgi::pipeline::{BenchmarkArtifacts, BenchmarkConfig, BenchmarkPipeline};
pub use corgi::postings::{FilteredUsers, PostingRow};
pub use corgi::registry::{AlgorithmRegistry, CommunityAlgorithm};
pub use corgi::report::EvaluationReport;
pub use corgi::similarity::{SimilarityMatrix, SimilarityMetric, SimilarityScorer};
pub use corgi::similarity_graph::SimilarityGraph;
pub use corgi::similarity_graph_builder::SimilarityGraphBuilder;
pub use corgi::test_utils::*;
