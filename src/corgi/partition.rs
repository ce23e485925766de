/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::collections::{BTreeMap, BTreeSet};

use crate::corgi::id_types::UserId;

pub type Community = BTreeSet<UserId>;

/// A division of graph users into communities, in the order the producing
/// algorithm emitted them. Nothing here enforces disjointness or coverage;
/// that is the scorer's concern.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Partition {
    communities: Vec<Community>,
}

impl Partition {
    pub fn new() -> Self {
        Self {
            communities: Vec::new(),
        }
    }

    pub fn from_communities(communities: Vec<Community>) -> Self {
        Self { communities }
    }

    /// Groups `(user, label)` assignments into communities. Output order is
    /// deterministic: communities are sorted by their smallest member.
    pub fn from_assignments<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (UserId, usize)>,
    {
        let mut by_label: BTreeMap<usize, Community> = BTreeMap::new();
        for (user, label) in assignments {
            by_label
                .entry(label)
                .or_insert_with(BTreeSet::new)
                .insert(user);
        }
        let mut partition = Self {
            communities: by_label.into_iter().map(|(_, c)| c).collect(),
        };
        partition.sort_by_min_member();
        partition
    }

    pub fn push(&mut self, community: Community) {
        self.communities.push(community);
    }

    pub fn sort_by_min_member(&mut self) {
        self.communities
            .sort_by_key(|c| c.iter().next().cloned());
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn num_communities(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.communities.iter().map(|c| c.len()).sum()
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.communities.iter().any(|c| c.contains(user))
    }

    /// Index of the first community containing `user`, if any.
    pub fn community_of(&self, user: &UserId) -> Option<usize> {
        self.communities.iter().position(|c| c.contains(user))
    }

    /// True when no user appears in more than one community.
    pub fn is_disjoint(&self) -> bool {
        let mut seen: BTreeSet<&UserId> = BTreeSet::new();
        self.communities
            .iter()
            .flatten()
            .all(|user| seen.insert(user))
    }

    /// Community sizes in descending order.
    pub fn community_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.communities.iter().map(|c| c.len()).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    pub fn iter(&self) -> std::slice::Iter<Community> {
        self.communities.iter()
    }
}
