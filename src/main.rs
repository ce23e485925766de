/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
extern crate clap;
extern crate lib_corgi;

use clap::{App, Arg, ArgMatches};

use lib_corgi::corgi::error::BenchResult;
use lib_corgi::corgi::input::Input;
use lib_corgi::corgi::output::Output;
use lib_corgi::corgi::pipeline::{BenchmarkPipeline, DEFAULT_ALGORITHMS};

fn get_command_line_args() -> ArgMatches<'static> {
    let matches: ArgMatches = App::new("Corgi")
        .version("0.1.0")
        .about(
            "Benchmarks community detection algorithms over user similarity \
             graphs built from posting exports read from stdin or files.",
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .multiple(true)
                .help(
                    "Path to a semicolon-separated postings export. May be \
                     given several times; rows are concatenated. Reads stdin \
                     when omitted.",
                ),
        )
        .arg(
            Arg::with_name("metric")
                .short("m")
                .long("metric")
                .takes_value(true)
                .default_value("iou")
                .help(
                    "Similarity metric: 'iou' (intersection over union) or \
                     'iom' (intersection over minimum).",
                ),
        )
        .arg(
            Arg::with_name("threshold")
                .short("t")
                .long("threshold")
                .takes_value(true)
                .default_value("0.0")
                .help(
                    "Edge threshold: two users are connected iff their \
                     similarity is strictly greater than this value.",
                ),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .takes_value(true)
                .default_value("3600")
                .help("Per-algorithm timeout in seconds (fractions allowed)."),
        )
        .arg(
            Arg::with_name("channels")
                .short("c")
                .long("channel")
                .takes_value(true)
                .multiple(true)
                .help(
                    "Channel to keep when filtering postings. May be given \
                     several times; keeps every channel when omitted.",
                ),
        )
        .arg(
            Arg::with_name("min_items")
                .long("min_items")
                .takes_value(true)
                .default_value("5")
                .help(
                    "Users need strictly more than this many distinct items \
                     to enter the roster.",
                ),
        )
        .arg(
            Arg::with_name("sample")
                .long("sample")
                .takes_value(true)
                .help("Fraction of qualifying users to keep, in (0, 1]."),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("0")
                .help("Seed for sampling and for seeded algorithms."),
        )
        .arg(
            Arg::with_name("algorithms")
                .short("a")
                .long("algorithms")
                .takes_value(true)
                .default_value(DEFAULT_ALGORITHMS)
                .help("Comma-separated algorithm names, run in the order given."),
        )
        .arg(
            Arg::with_name("channel_summary")
                .long("channel_summary")
                .help("Also print each user's most common channel."),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Print one JSON object per algorithm instead of the table."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Report progress on stderr."),
        )
        .get_matches();
    matches
}

fn main() -> BenchResult<()> {
    let matches: ArgMatches = get_command_line_args();
    let pipeline = BenchmarkPipeline::from_argmatches(&matches)?;
    let inputs: Vec<Input> = match matches.values_of("input") {
        Some(paths) => {
            let mut inputs: Vec<Input> = Vec::new();
            for path in paths {
                inputs.push(Input::file(path)?);
            }
            inputs
        }
        None => vec![Input::console()],
    };
    let mut output: Output = Output::console();
    pipeline.run(inputs, &mut output)?;
    Ok(())
}
