/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
pub mod algorithms;
pub mod error;
pub mod executor;
pub mod harness;
pub mod id_types;
pub mod input;
pub mod item_sets;
pub mod modularity;
pub mod node;
pub mod output;
pub mod partition;
pub mod pipeline;
pub mod postings;
pub mod registry;
pub mod report;
pub mod similarity;
pub mod similarity_graph;
pub mod similarity_graph_builder;
pub mod test_utils;
