/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::collections::HashSet;

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::id_types::UserId;
use crate::corgi::partition::Partition;
use crate::corgi::similarity_graph::SimilarityGraph;

/// Scores how good a partition is for a given graph. Higher is better.
pub trait QualityScorer {
    fn score(&self, graph: &SimilarityGraph, partition: &Partition) -> BenchResult<f64>;
}

/// Newman modularity over edge weights:
///
///   Q = sum over communities c of [ L_c / m - (D_c / 2m)^2 ]
///
/// where m is the total edge weight of the graph, L_c the weight of edges
/// with both endpoints in c, and D_c the summed strength of c's members.
///
/// Scoring demands a proper partition: every community member must be a
/// graph node appearing in exactly one community, and the communities
/// together must cover the whole graph. Anything else is a scoring
/// failure, as is a graph with no edge weight at all.
pub struct WeightedModularity {}

impl WeightedModularity {
    pub fn new() -> Self {
        Self {}
    }

    fn validate(graph: &SimilarityGraph, partition: &Partition) -> BenchResult<()> {
        let mut seen: HashSet<UserId> = HashSet::with_capacity(graph.count_nodes());
        for community in partition.iter() {
            for user in community {
                if !graph.has_node(*user) {
                    return Err(BenchError::ScoringFailure(format!(
                        "{user} is not a graph node"
                    )));
                }
                if !seen.insert(*user) {
                    return Err(BenchError::ScoringFailure(format!(
                        "{user} appears in more than one community"
                    )));
                }
            }
        }
        if seen.len() != graph.count_nodes() {
            return Err(BenchError::ScoringFailure(format!(
                "Partition covers {} of {} graph nodes",
                seen.len(),
                graph.count_nodes()
            )));
        }
        Ok(())
    }
}

impl QualityScorer for WeightedModularity {
    fn score(&self, graph: &SimilarityGraph, partition: &Partition) -> BenchResult<f64> {
        Self::validate(graph, partition)?;
        let total_weight = graph.total_edge_weight();
        if total_weight <= 0.0 {
            return Err(BenchError::ScoringFailure(
                "Graph has no edge weight".to_owned(),
            ));
        }
        let two_m = 2.0 * total_weight;
        let mut modularity: f64 = 0.0;
        for community in partition.iter() {
            let mut intra_twice: f64 = 0.0;
            let mut strength_sum: f64 = 0.0;
            for user in community {
                let node = graph.get_node(*user);
                strength_sum += node.strength();
                for (neighbor_id, weight) in node.get_edges() {
                    // Each intra-community edge is seen from both endpoints.
                    if community.contains(neighbor_id) {
                        intra_twice += *weight;
                    }
                }
            }
            let intra = intra_twice / 2.0;
            modularity += intra / total_weight - (strength_sum / two_m).powi(2);
        }
        Ok(modularity)
    }
}

impl Default for WeightedModularity {
    fn default() -> Self {
        Self::new()
    }
}
