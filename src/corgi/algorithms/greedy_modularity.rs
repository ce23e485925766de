/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

use ordered_float::OrderedFloat;

use crate::corgi::id_types::UserId;
use crate::corgi::partition::{Community, Partition};
use crate::corgi::registry::CommunityAlgorithm;
use crate::corgi::similarity_graph::SimilarityGraph;

type CommunityId = usize;

#[derive(Clone, Copy, Eq)]
struct MergeCandidate {
    delta: OrderedFloat<f64>,
    i: CommunityId,
    j: CommunityId,
}
impl MergeCandidate {
    fn new(delta: OrderedFloat<f64>, i: CommunityId, j: CommunityId) -> Self {
        Self { delta, i, j }
    }
}
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.delta < other.delta {
            Ordering::Less
        } else if self.delta > other.delta {
            Ordering::Greater
        } else if self.i > other.i {
            Ordering::Less
        } else if self.i < other.i {
            Ordering::Greater
        } else if self.j > other.j {
            Ordering::Less
        } else if self.j < other.j {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}
impl PartialEq for MergeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.delta == other.delta && self.i == other.i && self.j == other.j
    }
}
impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// State passed around between the steps of the merge loop. Community ids are
// indices into the initial sorted node roster; a merged community keeps the
// larger of the two ids.
struct MergeState {
    communities: HashMap<CommunityId, Community>,
    strengths: HashMap<CommunityId, f64>,
    delta_q: HashMap<CommunityId, HashMap<CommunityId, f64>>,
    heap: BinaryHeap<MergeCandidate>,
    total_weight: f64,
}

/// Clauset-Newman-Moore greedy modularity maximization, generalized to edge
/// weights. Every node starts as its own community; the pair merge with the
/// largest modularity gain is applied repeatedly until all remaining gains
/// are non-positive.
///
/// The candidate heap is lazy: merges invalidate entries in place instead of
/// removing them, and stale entries are skipped on pop by checking them
/// against the current gain table.
pub struct GreedyModularity {}

impl GreedyModularity {
    pub fn new() -> Self {
        Self {}
    }

    fn init_state(graph: &SimilarityGraph) -> MergeState {
        let sorted_ids = graph.get_ordered_node_ids();
        let mut communities: HashMap<CommunityId, Community> = HashMap::new();
        let mut strengths: HashMap<CommunityId, f64> = HashMap::new();
        let mut index_of: HashMap<UserId, CommunityId> = HashMap::new();
        for (i, id) in sorted_ids.iter().enumerate() {
            let mut community: Community = BTreeSet::new();
            community.insert(*id);
            communities.insert(i, community);
            strengths.insert(i, graph.get_node(*id).strength());
            index_of.insert(*id, i);
        }
        let total_weight = graph.total_edge_weight();
        let mut delta_q: HashMap<CommunityId, HashMap<CommunityId, f64>> = HashMap::new();
        let mut heap: BinaryHeap<MergeCandidate> = BinaryHeap::new();
        if total_weight > 0.0 {
            let two_m = 2.0 * total_weight;
            for (i, id) in sorted_ids.iter().enumerate() {
                for (neighbor_id, weight) in graph.get_node(*id).get_edges() {
                    let j = index_of[neighbor_id];
                    // 2 * (e_ij - a_i * a_j), with e_ij = w_ij / 2m and
                    // a_i = s_i / 2m.
                    let delta = *weight / total_weight
                        - 2.0 * (strengths[&i] / two_m) * (strengths[&j] / two_m);
                    delta_q.entry(i).or_insert_with(HashMap::new).insert(j, delta);
                    if i < j {
                        heap.push(MergeCandidate::new(OrderedFloat(delta), i, j));
                    }
                }
            }
        }
        MergeState {
            communities,
            strengths,
            delta_q,
            heap,
            total_weight,
        }
    }

    /// Pops until the top candidate matches the live gain table. Heap entries
    /// carry (smaller id, larger id), so the table lookup is canonical.
    fn pop_valid(state: &mut MergeState) -> Option<MergeCandidate> {
        while let Some(candidate) = state.heap.pop() {
            if !state.communities.contains_key(&candidate.i)
                || !state.communities.contains_key(&candidate.j)
            {
                continue;
            }
            let current = state
                .delta_q
                .get(&candidate.i)
                .and_then(|row| row.get(&candidate.j));
            if let Some(delta) = current {
                if OrderedFloat(*delta) == candidate.delta {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Folds community i into community j and recomputes the gains between
    /// the merged community and every community adjacent to either half.
    fn merge(state: &mut MergeState, i: CommunityId, j: CommunityId) {
        if let Some(com_i) = state.communities.remove(&i) {
            if let Some(com_j) = state.communities.get_mut(&j) {
                com_j.extend(com_i);
            }
        }
        let neighbors_i = state.delta_q.remove(&i).unwrap_or_default();
        let neighbors_j = state.delta_q.remove(&j).unwrap_or_default();
        let strength_i = state.strengths.remove(&i).unwrap_or(0.0);
        let strength_j = state.strengths.get(&j).copied().unwrap_or(0.0);
        let two_m = 2.0 * state.total_weight;

        let mut all_neighbors: HashSet<CommunityId> = neighbors_i.keys().copied().collect();
        all_neighbors.extend(neighbors_j.keys().copied());
        all_neighbors.remove(&i);
        all_neighbors.remove(&j);

        let mut merged_row: HashMap<CommunityId, f64> = HashMap::new();
        for k in all_neighbors {
            let delta_ik = neighbors_i.get(&k);
            let delta_jk = neighbors_j.get(&k);
            let strength_k = state.strengths.get(&k).copied().unwrap_or(0.0);
            let new_delta_jk = match (delta_ik, delta_jk) {
                // k touches both halves: gains simply add.
                (Some(x), Some(y)) => x + y,
                // k touches only one half: the null-model term for the other
                // half has to come off.
                (Some(x), None) => x - 2.0 * (strength_j / two_m) * (strength_k / two_m),
                (None, Some(y)) => y - 2.0 * (strength_i / two_m) * (strength_k / two_m),
                (None, None) => continue,
            };
            merged_row.insert(k, new_delta_jk);
            if let Some(row_k) = state.delta_q.get_mut(&k) {
                row_k.remove(&i);
                row_k.insert(j, new_delta_jk);
            }
            let (a, b) = if j < k { (j, k) } else { (k, j) };
            state
                .heap
                .push(MergeCandidate::new(OrderedFloat(new_delta_jk), a, b));
        }
        state.delta_q.insert(j, merged_row);
        state.strengths.insert(j, strength_i + strength_j);
    }
}

impl Default for GreedyModularity {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityAlgorithm for GreedyModularity {
    fn detect(&self, graph: &SimilarityGraph) -> Partition {
        let mut state = Self::init_state(graph);
        while let Some(candidate) = Self::pop_valid(&mut state) {
            if candidate.delta.into_inner() <= 0.0 {
                break;
            }
            Self::merge(&mut state, candidate.i, candidate.j);
        }
        let mut partition = Partition::from_communities(
            state.communities.into_iter().map(|(_, c)| c).collect(),
        );
        partition.sort_by_min_member();
        partition
    }
}
