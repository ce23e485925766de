/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::sync::Arc;

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::partition::Partition;
use crate::corgi::similarity_graph::SimilarityGraph;

/// A community detection algorithm, viewed as an opaque callable by the
/// harness. Implementations run inside a worker thread, so they must be
/// shippable across threads.
pub trait CommunityAlgorithm: Send + Sync {
    fn detect(&self, graph: &SimilarityGraph) -> Partition;
}

/// Adapter letting plain closures act as algorithms.
struct ClosureAlgorithm<F> {
    func: F,
}

impl<F> CommunityAlgorithm for ClosureAlgorithm<F>
where
    F: Fn(&SimilarityGraph) -> Partition + Send + Sync,
{
    fn detect(&self, graph: &SimilarityGraph) -> Partition {
        (self.func)(graph)
    }
}

/// Named algorithms, evaluated in registration order. Names are unique.
pub struct AlgorithmRegistry {
    entries: Vec<(String, Arc<dyn CommunityAlgorithm>)>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &str,
        algorithm: Arc<dyn CommunityAlgorithm>,
    ) -> BenchResult<()> {
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(BenchError::InvalidArgument(format!(
                "Algorithm already registered: {name}"
            )));
        }
        self.entries.push((name.to_owned(), algorithm));
        Ok(())
    }

    pub fn register_fn<F>(&mut self, name: &str, algorithm: F) -> BenchResult<()>
    where
        F: Fn(&SimilarityGraph) -> Partition + Send + Sync + 'static,
    {
        self.register(name, Arc::new(ClosureAlgorithm { func: algorithm }))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommunityAlgorithm>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, algorithm)| algorithm)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn CommunityAlgorithm>)> {
        self.entries
            .iter()
            .map(|(name, algorithm)| (name.as_str(), algorithm))
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}
