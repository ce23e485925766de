/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate serde_json;

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde_json::json;

use crate::corgi::error::BenchResult;
use crate::corgi::harness::{EvaluationRecord, RunStatus};
use crate::corgi::id_types::UserId;
use crate::corgi::output::Output;
use crate::corgi::postings::ChannelBreakdown;

/// Per-algorithm evaluation records, in the order the harness produced them,
/// plus the renderings the binary prints.
pub struct EvaluationReport {
    records: Vec<(String, EvaluationRecord)>,
}

impl EvaluationReport {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, name: &str, record: EvaluationRecord) {
        self.records.push((name.to_owned(), record));
    }

    pub fn get(&self, name: &str) -> Option<&EvaluationRecord> {
        self.records
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvaluationRecord)> {
        self.records
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Records ordered best-first by modularity. Unscored runs (timeouts and
    /// failures) sink to the bottom; ties keep evaluation order.
    pub fn ranked_by_modularity(&self) -> Vec<(&str, &EvaluationRecord)> {
        let mut ranked: Vec<(&str, &EvaluationRecord)> = self.iter().collect();
        ranked.sort_by_key(|(_, record)| match record.modularity {
            Some(modularity) => (0, Reverse(OrderedFloat(modularity))),
            None => (1, Reverse(OrderedFloat(f64::NEG_INFINITY))),
        });
        ranked
    }

    /// One JSON object per record, in evaluation order. Null runtime and
    /// modularity mark runs that produced no result.
    pub fn to_json_rows(&self) -> Vec<String> {
        self.iter()
            .map(|(name, record)| {
                let reason = match &record.status {
                    RunStatus::Failed(reason) => Some(reason.as_str()),
                    _ => None,
                };
                json!({
                    "algorithm": name,
                    "status": record.status.as_str(),
                    "runtime": record.runtime,
                    "modularity": record.modularity,
                    "num_communities": record.partition.as_ref().map(|p| p.num_communities()),
                    "community_sizes": record.partition.as_ref().map(|p| p.community_sizes()),
                    "reason": reason,
                })
                .to_string()
            })
            .collect()
    }

    pub fn print_json(&self, output: &mut Output) -> BenchResult<()> {
        for row in self.to_json_rows() {
            output.print(&row)?;
        }
        Ok(())
    }

    /// Fixed-width summary, best modularity first.
    pub fn render_table(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push(format!(
            "{:<24} {:>10} {:>12} {:>12} {:>12}",
            "algorithm", "status", "runtime_s", "modularity", "communities"
        ));
        for (name, record) in self.ranked_by_modularity() {
            let runtime = record
                .runtime
                .map_or("-".to_owned(), |r| format!("{:.3}", r));
            let modularity = record
                .modularity
                .map_or("-".to_owned(), |m| format!("{:.6}", m));
            let communities = record
                .partition
                .as_ref()
                .map_or("-".to_owned(), |p| p.num_communities().to_string());
            lines.push(format!(
                "{:<24} {:>10} {:>12} {:>12} {:>12}",
                name,
                record.status.as_str(),
                runtime,
                modularity,
                communities
            ));
        }
        lines.join("\n")
    }
}

impl Default for EvaluationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-user dominant channel, one row per user in ascending id order.
pub fn render_channel_summary(breakdowns: &BTreeMap<UserId, ChannelBreakdown>) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("{:<16} {:<24} {:>8}", "user", "top_channel", "count"));
    for (user, breakdown) in breakdowns {
        let (channel, count) = match breakdown.most_common() {
            Some(top) => top,
            None => continue,
        };
        lines.push(format!("{:<16} {:<24} {:>8}", user, channel, count));
    }
    lines.join("\n")
}
