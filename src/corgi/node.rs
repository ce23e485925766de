/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::cmp::{Eq, PartialEq};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::corgi::id_types::UserId;

/// A user inside a `SimilarityGraph`, with its weighted neighborhood. The
/// neighbor map is kept ordered so that iteration over edges is
/// deterministic.
#[derive(Clone, Debug)]
pub struct SimilarityNode {
    pub user_id: UserId,
    pub neighbors: BTreeMap<UserId, f64>,
}
impl Hash for SimilarityNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_id.hash(state);
    }
}
impl PartialEq for SimilarityNode {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}
impl Eq for SimilarityNode {}

impl SimilarityNode {
    pub fn new(user_id: UserId, neighbors: BTreeMap<UserId, f64>) -> Self {
        Self { user_id, neighbors }
    }

    /// degree is the neighbor count, ignoring weights.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// strength is the weighted degree: the sum of incident edge weights.
    pub fn strength(&self) -> f64 {
        self.neighbors.values().sum()
    }

    pub fn neighbor_weight(&self, neighbor_id: &UserId) -> Option<f64> {
        self.neighbors.get(neighbor_id).copied()
    }

    pub fn get_edges(&self) -> impl Iterator<Item = (&UserId, &f64)> {
        self.neighbors.iter()
    }
}
