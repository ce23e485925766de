/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use std::collections::{BTreeMap, HashSet};

use csv::{ReaderBuilder, StringRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::id_types::{ItemId, UserId};
use crate::corgi::input::Input;
use crate::corgi::item_sets::ItemSetMap;

pub const USER_COLUMN: &str = "ID_CommunityIdentity";
pub const ITEM_COLUMN: &str = "ID_Article";
pub const CHANNEL_COLUMN: &str = "ArticleChannel";

/// One posting event: a user consumed an item on a channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PostingRow {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub channel: String,
}

/// Reads semicolon-separated posting rows. The three well-known columns are
/// located by header name; surplus columns are ignored, which lets the raw
/// exports carry whatever extra metadata they like.
pub fn load_postings(input: Input) -> BenchResult<Vec<PostingRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let user_ix = column_index(&headers, USER_COLUMN)?;
    let item_ix = column_index(&headers, ITEM_COLUMN)?;
    let channel_ix = column_index(&headers, CHANNEL_COLUMN)?;
    let mut rows: Vec<PostingRow> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let user_id: i64 = require_field(&record, user_ix)?.parse()?;
        let item_id: u64 = require_field(&record, item_ix)?.parse()?;
        let channel = require_field(&record, channel_ix)?.to_owned();
        rows.push(PostingRow {
            user_id: UserId::from(user_id),
            item_id: ItemId::from(item_id),
            channel,
        });
    }
    Ok(rows)
}

/// Concatenates postings from several sources, e.g. one export per month.
pub fn load_all_postings(inputs: Vec<Input>) -> BenchResult<Vec<PostingRow>> {
    let mut rows: Vec<PostingRow> = Vec::new();
    for input in inputs {
        rows.extend(load_postings(input)?);
    }
    Ok(rows)
}

fn column_index(headers: &StringRecord, name: &str) -> BenchResult<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| BenchError::InvalidArgument(format!("Missing column: {name}")))
}

fn require_field<'a>(record: &'a StringRecord, index: usize) -> BenchResult<&'a str> {
    record
        .get(index)
        .ok_or_else(|| BenchError::from(format!("Short row: missing field {index}")))
}

/// Users passing the activity filter, with their item sets. The roster is in
/// ascending user id order.
#[derive(Clone, Debug)]
pub struct FilteredUsers {
    pub users: Vec<UserId>,
    pub item_sets: ItemSetMap,
}

/// Keeps users with strictly more than `min_items` distinct items among
/// postings on the requested channels. An empty channel list keeps postings
/// from every channel.
pub fn filter_users(rows: &[PostingRow], channels: &[String], min_items: u64) -> FilteredUsers {
    let channel_filter: HashSet<&str> = channels.iter().map(|c| c.as_str()).collect();
    let mut item_sets = ItemSetMap::new();
    for row in rows {
        if !channel_filter.is_empty() && !channel_filter.contains(row.channel.as_str()) {
            continue;
        }
        item_sets.add_posting(row.user_id, row.item_id);
    }
    let mut kept = ItemSetMap::new();
    let mut users: Vec<UserId> = Vec::new();
    for user in item_sets.sorted_users() {
        if let Some(set) = item_sets.get(&user) {
            if set.len() > min_items {
                users.push(user);
                kept.insert(user, set.clone());
            }
        }
    }
    FilteredUsers {
        users,
        item_sets: kept,
    }
}

/// Per-user posting counts by channel.
#[derive(Clone, Debug, Default)]
pub struct ChannelBreakdown {
    counts: BTreeMap<String, u64>,
}

impl ChannelBreakdown {
    pub fn add(&mut self, channel: &str) {
        *self.counts.entry(channel.to_owned()).or_insert(0) += 1;
    }

    pub fn count(&self, channel: &str) -> u64 {
        self.counts.get(channel).copied().unwrap_or(0)
    }

    /// Channel with the most postings; ties go to the lexicographically
    /// first name.
    pub fn most_common(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (channel, count) in &self.counts {
            match best {
                Some((_, best_count)) if *count <= best_count => {}
                _ => best = Some((channel.as_str(), *count)),
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }
}

/// Tallies every user's postings per channel, over unfiltered rows.
pub fn most_common_channels(rows: &[PostingRow]) -> BTreeMap<UserId, ChannelBreakdown> {
    let mut breakdowns: BTreeMap<UserId, ChannelBreakdown> = BTreeMap::new();
    for row in rows {
        breakdowns
            .entry(row.user_id)
            .or_insert_with(ChannelBreakdown::default)
            .add(&row.channel);
    }
    breakdowns
}

/// Downsamples the roster to `fraction` of its users, chosen without
/// replacement by the seeded generator. The sampled roster stays in
/// ascending id order.
pub fn sample_users(
    filtered: &FilteredUsers,
    fraction: f64,
    seed: u64,
) -> BenchResult<FilteredUsers> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(BenchError::InvalidArgument(format!(
            "Sample fraction must be in (0, 1], got {fraction}"
        )));
    }
    let amount = (filtered.users.len() as f64 * fraction).round() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut users: Vec<UserId> = filtered
        .users
        .choose_multiple(&mut rng, amount)
        .copied()
        .collect();
    users.sort();
    let mut item_sets = ItemSetMap::new();
    for user in &users {
        if let Some(set) = filtered.item_sets.get(user) {
            item_sets.insert(*user, set.clone());
        }
    }
    Ok(FilteredUsers { users, item_sets })
}
