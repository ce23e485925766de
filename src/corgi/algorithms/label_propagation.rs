/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::corgi::id_types::UserId;
use crate::corgi::partition::Partition;
use crate::corgi::registry::CommunityAlgorithm;
use crate::corgi::similarity_graph::SimilarityGraph;

const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Asynchronous label propagation over edge weights. Every node starts in
/// its own community; nodes repeatedly adopt the label carrying the most
/// incident edge weight until no label changes or the iteration cap is hit.
///
/// Node visit order is reshuffled each sweep and ties are broken by choice,
/// both driven by the seeded generator, so runs with the same seed produce
/// the same partition.
pub struct LabelPropagation {
    seed: u64,
    max_iterations: usize,
}

impl LabelPropagation {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl CommunityAlgorithm for LabelPropagation {
    fn detect(&self, graph: &SimilarityGraph) -> Partition {
        let ids = graph.get_ordered_node_ids();
        let n = ids.len();
        if n == 0 {
            return Partition::new();
        }
        let index_of: HashMap<UserId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for (i, id) in ids.iter().enumerate() {
            for (neighbor_id, weight) in graph.get_node(*id).get_edges() {
                adjacency[i].push((index_of[neighbor_id], *weight));
            }
        }

        let mut labels: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n).collect();
        for _ in 0..self.max_iterations {
            order.shuffle(&mut rng);
            let mut changed = false;
            for &node in order.iter() {
                let mut weight_by_label: BTreeMap<usize, f64> = BTreeMap::new();
                for &(neighbor, weight) in &adjacency[node] {
                    *weight_by_label.entry(labels[neighbor]).or_insert(0.0) += weight;
                }
                let max_weight = weight_by_label
                    .values()
                    .fold(f64::NEG_INFINITY, |acc, w| match acc.partial_cmp(w) {
                        Some(Ordering::Less) => *w,
                        _ => acc,
                    });
                let top_labels: Vec<usize> = weight_by_label
                    .iter()
                    .filter(|(_, weight)| **weight == max_weight)
                    .map(|(label, _)| *label)
                    .collect();
                // A node already carrying one of the heaviest labels stays
                // put, which is what lets the sweep converge.
                if top_labels.contains(&labels[node]) {
                    continue;
                }
                if let Some(&new_label) = top_labels.choose(&mut rng) {
                    labels[node] = new_label;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        Partition::from_assignments(ids.into_iter().zip(labels.into_iter()))
    }
}
