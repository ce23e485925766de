/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */
use thiserror::Error;

use crate::corgi::id_types::UserId;

pub type BenchResult<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("{0}")]
    Generic(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} has no item set")]
    MissingItemSet(UserId),

    #[error("{0} has an empty item set")]
    DegenerateItemSet(UserId),

    #[error("Worker panicked: {0}")]
    AlgorithmPanic(String),

    #[error("Scoring failed: {0}")]
    ScoringFailure(String),

    #[error("I/O Error: {0}")]
    IO(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("Parse error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("JSON error: {0}")]
    JSON(#[from] serde_json::Error),
}

impl BenchError {
    pub fn new(msg: &str) -> Self {
        Self::Generic(msg.to_owned())
    }
    pub fn invalid_argument(msg: &str) -> Self {
        Self::InvalidArgument(msg.to_owned())
    }
}

impl From<String> for BenchError {
    fn from(str: String) -> Self {
        BenchError::Generic(str)
    }
}

impl From<&str> for BenchError {
    fn from(str: &str) -> Self {
        BenchError::Generic(str.to_owned())
    }
}
