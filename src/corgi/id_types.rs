/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::fmt;

/// Uniquely identifies a user, relative to an existing posting corpus. Users
/// are graph nodes once a `SimilarityGraph` has been built.
#[derive(Hash, Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub struct UserId {
    id: i64,
}
impl UserId {
    pub fn value(&self) -> i64 {
        self.id
    }
}
impl<T> From<T> for UserId
where
    T: Into<i64>,
{
    fn from(n: T) -> Self {
        Self { id: n.into() }
    }
}
impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "User:{}", self.id)
    }
}

/// An opaque identifier for a consumed item (an article, a track, a post).
/// Not interpreted by corgi logic in any way beyond set membership.
#[derive(Hash, Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub struct ItemId {
    id: u64,
}
impl ItemId {
    pub fn value(&self) -> u64 {
        self.id
    }
}
impl<T> From<T> for ItemId
where
    T: Into<u64>,
{
    fn from(n: T) -> Self {
        Self { id: n.into() }
    }
}
impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Item:{}", self.id)
    }
}
