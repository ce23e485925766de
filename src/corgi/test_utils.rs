/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::thread;
use std::time::Duration;

use crate::corgi::id_types::{ItemId, UserId};
use crate::corgi::item_sets::{ItemSet, ItemSetMap};
use crate::corgi::partition::{Community, Partition};
use crate::corgi::postings::{CHANNEL_COLUMN, ITEM_COLUMN, USER_COLUMN};
use crate::corgi::registry::CommunityAlgorithm;
use crate::corgi::similarity_graph::SimilarityGraph;
use crate::corgi::similarity_graph_builder::SimilarityGraphBuilder;

pub fn gen_item_set(items: &[u64]) -> ItemSet {
    items.iter().map(|item| ItemId::from(*item)).collect()
}

pub fn gen_item_sets(entries: &[(i64, &[u64])]) -> (Vec<UserId>, ItemSetMap) {
    let mut users: Vec<UserId> = Vec::new();
    let mut item_sets = ItemSetMap::new();
    for (user, items) in entries {
        let user_id = UserId::from(*user);
        users.push(user_id);
        item_sets.insert(user_id, gen_item_set(items));
    }
    (users, item_sets)
}

pub fn gen_weighted_graph(edges: &[(i64, i64, f64)]) -> SimilarityGraph {
    SimilarityGraphBuilder::from_weighted_edges(edges.to_vec())
}

/// Two unit-weight triangles joined by one weak bridge; the classic case
/// where the triangles are the right communities.
pub fn gen_two_triangle_graph() -> SimilarityGraph {
    gen_weighted_graph(&[
        (0, 1, 1.0),
        (1, 2, 1.0),
        (0, 2, 1.0),
        (3, 4, 1.0),
        (4, 5, 1.0),
        (3, 5, 1.0),
        (2, 3, 0.1),
    ])
}

pub fn gen_community(members: &[i64]) -> Community {
    members.iter().map(|id| UserId::from(*id)).collect()
}

/// Builds a semicolon-separated postings export. Column order is scrambled
/// relative to the usual exports and a surplus column is appended, since
/// loading is by header name.
pub fn gen_postings_csv(rows: &[(i64, u64, &str)]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "{};{};{};Extra",
        USER_COLUMN, CHANNEL_COLUMN, ITEM_COLUMN
    ));
    for (user, item, channel) in rows {
        lines.push(format!("{user};{channel};{item};x"));
    }
    lines.join("\n")
}

/// Algorithm that sleeps through its deadline, for timeout tests.
pub struct SleepyAlgorithm {
    pub duration: Duration,
}
impl CommunityAlgorithm for SleepyAlgorithm {
    fn detect(&self, graph: &SimilarityGraph) -> Partition {
        thread::sleep(self.duration);
        let members: Community = graph.get_ordered_node_ids().into_iter().collect();
        Partition::from_communities(vec![members])
    }
}

/// Algorithm that panics, for crash-isolation tests.
pub struct PanickyAlgorithm {}
impl CommunityAlgorithm for PanickyAlgorithm {
    fn detect(&self, _graph: &SimilarityGraph) -> Partition {
        panic!("deliberate test panic")
    }
}

/// Algorithm returning a canned partition regardless of input.
pub struct FixedPartition {
    pub partition: Partition,
}
impl CommunityAlgorithm for FixedPartition {
    fn detect(&self, _graph: &SimilarityGraph) -> Partition {
        self.partition.clone()
    }
}
