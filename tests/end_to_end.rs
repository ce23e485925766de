/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate lib_corgi;
extern crate serde_json;

use std::time::Duration;

use lib_corgi::corgi::error::BenchError;
use lib_corgi::corgi::input::Input;
use lib_corgi::corgi::output::Output;
use lib_corgi::corgi::partition::Partition;
use lib_corgi::corgi::pipeline::{BenchmarkConfig, BenchmarkPipeline};
use lib_corgi::corgi::test_utils::{gen_community, gen_postings_csv};

/// Two tight reader pairs plus one low-activity user. Users 1 and 2 share
/// five of seven distinct items, as do users 3 and 4; the pairs share
/// nothing with each other and user 5 never clears the activity filter.
fn gen_fixture_csv() -> String {
    gen_postings_csv(&[
        (1, 10, "news"),
        (1, 10, "news"),
        (1, 11, "news"),
        (1, 12, "news"),
        (1, 13, "news"),
        (1, 14, "news"),
        (1, 15, "news"),
        (2, 10, "news"),
        (2, 11, "news"),
        (2, 12, "news"),
        (2, 13, "news"),
        (2, 14, "news"),
        (2, 16, "news"),
        (3, 20, "forum"),
        (3, 21, "forum"),
        (3, 22, "forum"),
        (3, 23, "forum"),
        (3, 24, "forum"),
        (3, 25, "forum"),
        (4, 20, "forum"),
        (4, 21, "forum"),
        (4, 22, "forum"),
        (4, 23, "forum"),
        (4, 24, "forum"),
        (4, 26, "forum"),
        (5, 30, "sports"),
        (5, 31, "sports"),
    ])
}

fn gen_config() -> BenchmarkConfig {
    let mut config = BenchmarkConfig::default();
    config.threshold = 0.5;
    config.timeout = Duration::from_secs(30);
    config
}

fn gen_expected_partition() -> Partition {
    Partition::from_communities(vec![gen_community(&[1, 2]), gen_community(&[3, 4])])
}

#[test]
fn test_pipeline_runs_all_stock_algorithms() {
    let text = gen_fixture_csv();
    let pipeline = BenchmarkPipeline::new(gen_config()).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    let mut output = Output::string(&mut buffer);
    let artifacts = pipeline
        .run(vec![Input::string(text.as_bytes())], &mut output)
        .unwrap();
    // User 5 is filtered out before scoring, so the matrix is 4x4.
    assert_eq!(artifacts.matrix.nrows(), 4);
    assert_eq!(artifacts.matrix.ncols(), 4);
    assert!((artifacts.matrix[(0, 1)] - 5.0 / 7.0).abs() < 1e-12);
    assert_eq!(artifacts.matrix[(0, 2)], 0.0);
    assert_eq!(artifacts.graph.count_nodes(), 4);
    assert_eq!(artifacts.graph.count_edges(), 2);
    let names: Vec<&str> = artifacts.report.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["connected_components", "label_propagation", "greedy_modularity"]
    );
    for (_, record) in artifacts.report.iter() {
        assert!(record.is_completed());
        // Both pairs hold half the weight, so modularity is exactly 1/2.
        assert!((record.modularity.unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(record.partition.as_ref().unwrap(), &gen_expected_partition());
    }
    let rendered = String::from_utf8(buffer).unwrap();
    assert!(rendered.contains("connected_components"));
    assert!(rendered.contains("greedy_modularity"));
    assert!(rendered.contains("completed"));
}

#[test]
fn test_pipeline_json_output() {
    let text = gen_fixture_csv();
    let mut config = gen_config();
    config.json = true;
    let pipeline = BenchmarkPipeline::new(config).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    let mut output = Output::string(&mut buffer);
    pipeline
        .run(vec![Input::string(text.as_bytes())], &mut output)
        .unwrap();
    let rendered = String::from_utf8(buffer).unwrap();
    let rows: Vec<serde_json::Value> = rendered
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["algorithm"], "connected_components");
    assert_eq!(rows[0]["status"], "completed");
    assert_eq!(rows[0]["num_communities"], 2);
    assert!((rows[0]["modularity"].as_f64().unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn test_pipeline_channel_filter_drops_the_other_pair() {
    let text = gen_fixture_csv();
    let mut config = gen_config();
    config.channels = vec!["news".to_owned()];
    let pipeline = BenchmarkPipeline::new(config).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    let mut output = Output::string(&mut buffer);
    let artifacts = pipeline
        .run(vec![Input::string(text.as_bytes())], &mut output)
        .unwrap();
    // Only the news pair survives the channel filter.
    assert_eq!(artifacts.matrix.nrows(), 2);
    assert_eq!(artifacts.graph.count_nodes(), 2);
    assert_eq!(artifacts.graph.count_edges(), 1);
}

#[test]
fn test_pipeline_channel_summary_lists_every_user() {
    let text = gen_fixture_csv();
    let mut config = gen_config();
    config.channel_summary = true;
    let pipeline = BenchmarkPipeline::new(config).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    let mut output = Output::string(&mut buffer);
    pipeline
        .run(vec![Input::string(text.as_bytes())], &mut output)
        .unwrap();
    let rendered = String::from_utf8(buffer).unwrap();
    // The summary covers unfiltered rows, so user 5 appears with its
    // dominant channel even though it never reaches the graph.
    assert!(rendered.contains("top_channel"));
    assert!(rendered.contains("User:5"));
    assert!(rendered.contains("sports"));
}

#[test]
fn test_pipeline_sampling_shrinks_the_roster() {
    let text = gen_fixture_csv();
    let mut config = gen_config();
    config.sample = Some(0.5);
    config.seed = 3;
    let pipeline = BenchmarkPipeline::new(config).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    let mut output = Output::string(&mut buffer);
    let artifacts = pipeline
        .run(vec![Input::string(text.as_bytes())], &mut output)
        .unwrap();
    assert_eq!(artifacts.matrix.nrows(), 2);
    assert!(artifacts.graph.count_nodes() <= 2);
}

#[test]
fn test_pipeline_rejects_unknown_algorithm() {
    match BenchmarkPipeline::build_registry(&["petersen".to_owned()], 0) {
        Err(BenchError::InvalidArgument(message)) => assert!(message.contains("petersen")),
        other => panic!("Expected InvalidArgument, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_pipeline_rejects_bad_configs() {
    let mut no_algorithms = gen_config();
    no_algorithms.algorithms.clear();
    assert!(BenchmarkPipeline::new(no_algorithms).is_err());
    let mut bad_threshold = gen_config();
    bad_threshold.threshold = -1.0;
    assert!(BenchmarkPipeline::new(bad_threshold).is_err());
    let mut zero_timeout = gen_config();
    zero_timeout.timeout = Duration::from_secs(0);
    assert!(BenchmarkPipeline::new(zero_timeout).is_err());
    let mut bad_sample = gen_config();
    bad_sample.sample = Some(2.0);
    assert!(BenchmarkPipeline::new(bad_sample).is_err());
}
