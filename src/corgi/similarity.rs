/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::id_types::UserId;
use crate::corgi::item_sets::{ItemSet, ItemSetMap};

/// Symmetric user-by-user similarity matrix with a zero diagonal. Row and
/// column order follows the user roster the matrix was computed from.
pub type SimilarityMatrix = DMatrix<f64>;

/// Set-overlap measure used to compare two users' item sets. Both measures
/// land in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimilarityMetric {
    /// |A n B| / |A u B|, the Jaccard index.
    IntersectionOverUnion,
    /// |A n B| / min(|A|, |B|), the overlap coefficient. Equals 1.0 whenever
    /// one set contains the other.
    IntersectionOverMinimum,
}

impl SimilarityMetric {
    pub fn score(&self, first: &ItemSet, second: &ItemSet) -> f64 {
        let intersection = first.intersection_size(second);
        let denominator = match self {
            SimilarityMetric::IntersectionOverUnion => first.union_size(second),
            SimilarityMetric::IntersectionOverMinimum => first.len().min(second.len()),
        };
        if denominator == 0 {
            return 0.0;
        }
        intersection as f64 / denominator as f64
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::IntersectionOverUnion => "iou",
            SimilarityMetric::IntersectionOverMinimum => "iom",
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = BenchError;

    fn from_str(s: &str) -> BenchResult<Self> {
        match s {
            "iou" | "jaccard" => Ok(SimilarityMetric::IntersectionOverUnion),
            "iom" | "overlap" => Ok(SimilarityMetric::IntersectionOverMinimum),
            _ => Err(BenchError::InvalidArgument(format!(
                "Unknown similarity metric: {s}"
            ))),
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes pairwise similarity over a roster of users. The all-pairs matrix
/// is the quadratic step of the benchmark, so rows are filled in parallel;
/// each entry depends only on its own pair of item sets, which keeps the
/// result bit-for-bit identical across thread counts.
pub struct SimilarityScorer {
    metric: SimilarityMetric,
}

impl SimilarityScorer {
    pub fn new(metric: SimilarityMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn score_pair(&self, first: &ItemSet, second: &ItemSet) -> f64 {
        self.metric.score(first, second)
    }

    /// Builds the N x N similarity matrix for `users`, in roster order. Every
    /// user must have a non-empty item set; a missing or empty set aborts the
    /// computation rather than silently producing zero rows.
    pub fn compute_matrix(
        &self,
        users: &[UserId],
        item_sets: &ItemSetMap,
    ) -> BenchResult<SimilarityMatrix> {
        let mut sets: Vec<&ItemSet> = Vec::with_capacity(users.len());
        for user in users {
            let set = item_sets.require(user)?;
            if set.is_empty() {
                return Err(BenchError::DegenerateItemSet(*user));
            }
            sets.push(set);
        }
        let n = users.len();
        let metric = self.metric;
        // Strict upper triangle only; mirrored below.
        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i + 1..n)
                    .map(|j| metric.score(sets[i], sets[j]))
                    .collect()
            })
            .collect();
        let mut matrix = SimilarityMatrix::zeros(n, n);
        for (i, row) in rows.iter().enumerate() {
            for (offset, &score) in row.iter().enumerate() {
                let j = i + 1 + offset;
                matrix[(i, j)] = score;
                matrix[(j, i)] = score;
            }
        }
        Ok(matrix)
    }
}
