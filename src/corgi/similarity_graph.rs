/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate fxhash;
use fxhash::FxHashMap;
use std::collections::hash_map::{Keys, Values};

use crate::corgi::id_types::UserId;
use crate::corgi::node::SimilarityNode;

/// Keeps track of a weighted undirected user-user graph. Every node has at
/// least one neighbor: users whose similarity never clears the edge threshold
/// are never added, so zero-degree users simply do not appear.
#[derive(Clone, Debug)]
pub struct SimilarityGraph {
    pub nodes: FxHashMap<UserId, SimilarityNode>,
    pub ids: Vec<UserId>,
}

impl SimilarityGraph {
    pub fn create_empty() -> Self {
        SimilarityGraph {
            nodes: FxHashMap::default(),
            ids: Vec::new(),
        }
    }

    pub fn has_node(&self, user_id: UserId) -> bool {
        self.nodes.contains_key(&user_id)
    }

    /// Panics if the node is absent; callers check `has_node` first or walk
    /// `ids`, which always names present nodes.
    pub fn get_node(&self, user_id: UserId) -> &SimilarityNode {
        &self.nodes[&user_id]
    }

    pub fn get_ids_iter(&self) -> Keys<UserId, SimilarityNode> {
        self.nodes.keys()
    }

    pub fn get_nodes_iter(&self) -> Values<UserId, SimilarityNode> {
        self.nodes.values()
    }

    pub fn count_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Each undirected edge is stored in both endpoint neighborhoods.
    pub fn count_edges(&self) -> usize {
        let mut num_edges: usize = 0;
        for node in self.nodes.values() {
            num_edges += node.neighbors.len();
        }
        num_edges / 2
    }

    pub fn total_edge_weight(&self) -> f64 {
        let mut total: f64 = 0.0;
        for node in self.nodes.values() {
            total += node.strength();
        }
        total / 2.0
    }

    pub fn get_node_degree(&self, id: UserId) -> usize {
        self.nodes[&id].degree()
    }

    pub fn get_edge_weight(&self, id1: UserId, id2: UserId) -> Option<f64> {
        self.nodes.get(&id1)?.neighbor_weight(&id2)
    }

    pub fn get_ordered_node_ids(&self) -> Vec<UserId> {
        let mut node_ids: Vec<UserId> = self.nodes.keys().cloned().collect();
        node_ids.sort();
        node_ids
    }
}
