/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::corgi::id_types::UserId;
use crate::corgi::partition::{Community, Partition};
use crate::corgi::registry::CommunityAlgorithm;
use crate::corgi::similarity_graph::SimilarityGraph;

/// The baseline partitioner: every connected component is one community.
pub struct ConnectedComponents {}

impl ConnectedComponents {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ConnectedComponents {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityAlgorithm for ConnectedComponents {
    fn detect(&self, graph: &SimilarityGraph) -> Partition {
        let mut visited: HashSet<UserId> = HashSet::with_capacity(graph.count_nodes());
        let mut partition = Partition::new();
        // BFS from each unvisited node, in ascending id order so components
        // come out sorted by their smallest member.
        for root in graph.get_ordered_node_ids() {
            if visited.contains(&root) {
                continue;
            }
            let mut component: Community = BTreeSet::new();
            let mut queue: VecDeque<UserId> = VecDeque::new();
            visited.insert(root);
            queue.push_back(root);
            while let Some(id) = queue.pop_front() {
                component.insert(id);
                for (neighbor_id, _weight) in graph.get_node(id).get_edges() {
                    if visited.insert(*neighbor_id) {
                        queue.push_back(*neighbor_id);
                    }
                }
            }
            partition.push(component);
        }
        partition
    }
}
