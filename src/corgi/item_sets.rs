/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::iter::FromIterator;

use fxhash::FxHashMap;
use roaring::RoaringTreemap;

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::id_types::{ItemId, UserId};

/// The set of distinct items a single user has consumed, stored as a
/// compressed bitmap. Duplicate postings of the same item collapse into one
/// membership bit, so set sizes reflect distinct items only.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSet {
    items: RoaringTreemap,
}

impl ItemSet {
    pub fn new() -> Self {
        Self {
            items: RoaringTreemap::new(),
        }
    }

    /// Returns true if the item was not already present.
    pub fn insert(&mut self, item: ItemId) -> bool {
        self.items.insert(item.value())
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(item.value())
    }

    pub fn len(&self) -> u64 {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn intersection_size(&self, other: &ItemSet) -> u64 {
        (&self.items & &other.items).len()
    }

    pub fn union_size(&self, other: &ItemSet) -> u64 {
        self.items.len() + other.items.len() - self.intersection_size(other)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(ItemId::from)
    }
}

impl Default for ItemSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ItemId> for ItemSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        let mut set = ItemSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// A mapping from users to their item sets. Encapsulates some
/// special/convenient accessor/mutator logic.
#[derive(Clone, Debug, Default)]
pub struct ItemSetMap {
    data: FxHashMap<UserId, ItemSet>,
}

impl ItemSetMap {
    pub fn new() -> Self {
        Self {
            data: FxHashMap::default(),
        }
    }

    pub fn add_posting(&mut self, user: UserId, item: ItemId) {
        self.data.entry(user).or_insert_with(ItemSet::new).insert(item);
    }

    pub fn insert(&mut self, user: UserId, set: ItemSet) {
        self.data.insert(user, set);
    }

    pub fn get(&self, user: &UserId) -> Option<&ItemSet> {
        self.data.get(user)
    }

    pub fn require(&self, user: &UserId) -> BenchResult<&ItemSet> {
        let set = self
            .data
            .get(user)
            .ok_or_else(|| BenchError::MissingItemSet(*user))?;
        Ok(set)
    }

    pub fn contains_user(&self, user: &UserId) -> bool {
        self.data.contains_key(user)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &ItemSet)> {
        self.data.iter()
    }

    /// User ids in ascending order, the canonical ordering used when a
    /// stable user roster is needed.
    pub fn sorted_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.data.keys().cloned().collect();
        users.sort();
        users
    }
}
