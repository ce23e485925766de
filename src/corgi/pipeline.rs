/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate clap;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;

use crate::corgi::algorithms::connected_components::ConnectedComponents;
use crate::corgi::algorithms::greedy_modularity::GreedyModularity;
use crate::corgi::algorithms::label_propagation::LabelPropagation;
use crate::corgi::error::{BenchError, BenchResult};
use crate::corgi::harness::{EvaluationHarness, FailurePolicy};
use crate::corgi::input::Input;
use crate::corgi::modularity::WeightedModularity;
use crate::corgi::output::Output;
use crate::corgi::postings::{
    filter_users, load_all_postings, most_common_channels, sample_users, FilteredUsers,
};
use crate::corgi::registry::AlgorithmRegistry;
use crate::corgi::report::{render_channel_summary, EvaluationReport};
use crate::corgi::similarity::{SimilarityMatrix, SimilarityMetric, SimilarityScorer};
use crate::corgi::similarity_graph::SimilarityGraph;
use crate::corgi::similarity_graph_builder::SimilarityGraphBuilder;

pub const DEFAULT_ALGORITHMS: &str = "connected_components,label_propagation,greedy_modularity";

/// Runtime knobs for one benchmark run.
#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub metric: SimilarityMetric,
    pub threshold: f64,
    pub timeout: Duration,
    pub verbose: bool,
    /// Channels to keep; empty keeps everything.
    pub channels: Vec<String>,
    /// Users need strictly more than this many distinct items to qualify.
    pub min_items: u64,
    /// Optional fraction of qualifying users to keep, in (0, 1].
    pub sample: Option<f64>,
    pub seed: u64,
    /// Stock algorithm names, run in the order given.
    pub algorithms: Vec<String>,
    pub channel_summary: bool,
    pub json: bool,
}

impl BenchmarkConfig {
    pub fn validate(&self) -> BenchResult<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(BenchError::InvalidArgument(format!(
                "Threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        if self.timeout.as_nanos() == 0 {
            return Err(BenchError::InvalidArgument(
                "Timeout must be positive".to_owned(),
            ));
        }
        if let Some(fraction) = self.sample {
            if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
                return Err(BenchError::InvalidArgument(format!(
                    "Sample fraction must be in (0, 1], got {fraction}"
                )));
            }
        }
        if self.algorithms.is_empty() {
            return Err(BenchError::InvalidArgument(
                "At least one algorithm is required".to_owned(),
            ));
        }
        Ok(())
    }

    /// Constructs a config from an ArgMatches object (to help with command
    /// line arguments).
    pub fn from_argmatches(matches: &ArgMatches) -> BenchResult<Self> {
        let arg_value = |name: &str| -> BenchResult<&str> {
            matches
                .value_of(name)
                .ok_or_else(|| BenchError::from(format!("Missing required argument: {}", name)))
        };
        let metric = SimilarityMetric::from_str(arg_value("metric")?)?;
        let threshold: f64 = arg_value("threshold")?.parse::<f64>()?;
        let timeout_secs: f64 = arg_value("timeout")?.parse::<f64>()?;
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(BenchError::InvalidArgument(format!(
                "Timeout must be positive, got {timeout_secs}"
            )));
        }
        let timeout = Duration::from_secs_f64(timeout_secs);
        let channels: Vec<String> = match matches.values_of("channels") {
            Some(values) => values.map(|value| value.to_owned()).collect(),
            None => Vec::new(),
        };
        let min_items: u64 = arg_value("min_items")?.parse::<u64>()?;
        let sample: Option<f64> = match matches.value_of("sample") {
            Some(value) => Some(value.parse::<f64>()?),
            None => None,
        };
        let seed: u64 = arg_value("seed")?.parse::<u64>()?;
        let algorithms: Vec<String> = arg_value("algorithms")?
            .split(',')
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        let config = Self {
            metric,
            threshold,
            timeout,
            verbose: matches.is_present("verbose"),
            channels,
            min_items,
            sample,
            seed,
            algorithms,
            channel_summary: matches.is_present("channel_summary"),
            json: matches.is_present("json"),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::IntersectionOverUnion,
            threshold: 0.0,
            timeout: Duration::from_secs(3600),
            verbose: false,
            channels: Vec::new(),
            min_items: 5,
            sample: None,
            seed: 0,
            algorithms: DEFAULT_ALGORITHMS
                .split(',')
                .map(|name| name.to_owned())
                .collect(),
            channel_summary: false,
            json: false,
        }
    }
}

/// Everything a run produces: the matrix and graph it ran over, plus the
/// per-algorithm records, for downstream tabulation.
pub struct BenchmarkArtifacts {
    pub matrix: SimilarityMatrix,
    pub graph: SimilarityGraph,
    pub report: EvaluationReport,
}

/// End-to-end driver: posting exports in, evaluation report out.
pub struct BenchmarkPipeline {
    config: BenchmarkConfig,
}

impl BenchmarkPipeline {
    pub fn new(config: BenchmarkConfig) -> BenchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_argmatches(matches: &ArgMatches) -> BenchResult<Self> {
        Ok(Self {
            config: BenchmarkConfig::from_argmatches(matches)?,
        })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Builds the stock registry. Unknown names are rejected up front so a
    /// typo fails before any CSV is read.
    pub fn build_registry(algorithms: &[String], seed: u64) -> BenchResult<AlgorithmRegistry> {
        let mut registry = AlgorithmRegistry::new();
        for name in algorithms {
            match name.as_str() {
                "connected_components" => {
                    registry.register(name, Arc::new(ConnectedComponents::new()))?
                }
                "label_propagation" => {
                    registry.register(name, Arc::new(LabelPropagation::new(seed)))?
                }
                "greedy_modularity" => {
                    registry.register(name, Arc::new(GreedyModularity::new()))?
                }
                _ => {
                    return Err(BenchError::InvalidArgument(format!(
                        "Unknown algorithm: {name}"
                    )))
                }
            }
        }
        Ok(registry)
    }

    pub fn run(&self, inputs: Vec<Input>, output: &mut Output) -> BenchResult<BenchmarkArtifacts> {
        let rows = load_all_postings(inputs)?;
        if self.config.verbose {
            eprintln!("Loaded {} posting rows.", rows.len());
        }
        if self.config.channel_summary {
            output.print(&render_channel_summary(&most_common_channels(&rows)))?;
        }
        let filtered: FilteredUsers =
            filter_users(&rows, &self.config.channels, self.config.min_items);
        let filtered = match self.config.sample {
            Some(fraction) => sample_users(&filtered, fraction, self.config.seed)?,
            None => filtered,
        };
        if self.config.verbose {
            eprintln!("Keeping {} users after filtering.", filtered.users.len());
        }
        let scorer = SimilarityScorer::new(self.config.metric);
        let matrix = scorer.compute_matrix(&filtered.users, &filtered.item_sets)?;
        let graph =
            SimilarityGraphBuilder::from_matrix(&filtered.users, &matrix, self.config.threshold)?;
        if self.config.verbose {
            eprintln!(
                "Similarity graph: {} nodes, {} edges.",
                graph.count_nodes(),
                graph.count_edges()
            );
        }
        let registry = Self::build_registry(&self.config.algorithms, self.config.seed)?;
        let modularity = WeightedModularity::new();
        let harness = EvaluationHarness::new(
            &graph,
            &modularity,
            self.config.timeout,
            self.config.verbose,
            FailurePolicy::SkipAndContinue,
        )?;
        let report = harness.evaluate(&registry)?;
        if self.config.json {
            report.print_json(output)?;
        } else {
            output.print(&report.render_table())?;
        }
        Ok(BenchmarkArtifacts {
            matrix,
            graph,
            report,
        })
    }
}
