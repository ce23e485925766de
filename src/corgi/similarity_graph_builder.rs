/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate fxhash;

use std::collections::{BTreeMap, HashSet};

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::id_types::UserId;
use crate::corgi::node::SimilarityNode;
use crate::corgi::similarity::SimilarityMatrix;
use crate::corgi::similarity_graph::SimilarityGraph;

pub struct SimilarityGraphBuilder {}

impl SimilarityGraphBuilder {
    /// Thresholds a similarity matrix into a graph: an edge exists between
    /// users i and j exactly when `matrix[(i, j)]` is strictly greater than
    /// `threshold`, weighted by the similarity score. Users whose every score
    /// is at or below the threshold end up with no edges and are absent from
    /// the graph entirely.
    pub fn from_matrix(
        users: &[UserId],
        matrix: &SimilarityMatrix,
        threshold: f64,
    ) -> BenchResult<SimilarityGraph> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(BenchError::InvalidArgument(format!(
                "Threshold must be finite and non-negative, got {threshold}"
            )));
        }
        if matrix.nrows() != matrix.ncols() {
            return Err(BenchError::InvalidArgument(format!(
                "Similarity matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.nrows() != users.len() {
            return Err(BenchError::InvalidArgument(format!(
                "Matrix size {} does not match user roster size {}",
                matrix.nrows(),
                users.len()
            )));
        }
        let mut seen: HashSet<UserId> = HashSet::new();
        for user in users {
            if !seen.insert(*user) {
                return Err(BenchError::InvalidArgument(format!(
                    "Duplicate user in roster: {user}"
                )));
            }
        }
        let mut data: Vec<(i64, i64, f64)> = Vec::new();
        for (i, j) in (0..users.len()).tuple_combinations::<(usize, usize)>() {
            let score = matrix[(i, j)];
            if score > threshold {
                data.push((users[i].value(), users[j].value(), score));
            }
        }
        Ok(Self::from_weighted_edges(data))
    }

    /// Builds a graph from a vector of weighted edges. Edges only need to be
    /// provided once (this being an undirected graph); a repeated edge
    /// overwrites the earlier weight, and self-loops are dropped.
    pub fn from_weighted_edges(data: Vec<(i64, i64, f64)>) -> SimilarityGraph {
        let ids = Self::get_neighbor_maps(&data);
        let nodes = Self::get_nodes(ids);
        let mut graph_ids: Vec<UserId> = nodes.keys().cloned().collect();
        graph_ids.sort();
        SimilarityGraph {
            ids: graph_ids,
            nodes,
        }
    }

    fn get_neighbor_maps(data: &[(i64, i64, f64)]) -> BTreeMap<UserId, BTreeMap<UserId, f64>> {
        let mut ids: BTreeMap<UserId, BTreeMap<UserId, f64>> = BTreeMap::new();
        for (id1, id2, weight) in data {
            if id1 == id2 {
                continue;
            }
            ids.entry(UserId::from(*id1))
                .or_insert_with(BTreeMap::new)
                .insert(UserId::from(*id2), *weight);
            ids.entry(UserId::from(*id2))
                .or_insert_with(BTreeMap::new)
                .insert(UserId::from(*id1), *weight);
        }
        ids
    }

    fn get_nodes(
        ids: BTreeMap<UserId, BTreeMap<UserId, f64>>,
    ) -> FxHashMap<UserId, SimilarityNode> {
        let mut nodes: FxHashMap<UserId, SimilarityNode> = FxHashMap::default();
        for (id, neighbors) in ids.into_iter() {
            nodes.insert(id, SimilarityNode::new(id, neighbors));
        }
        nodes
    }
}
