//! Error types for loading and filtering record sets.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// A single field in a source file that could not be decoded.
#[derive(Debug, Error, PartialEq)]
#[error("{path}:{line}: invalid `{column}` value {value:?}: {reason}")]
pub struct ParseError {
    pub path: PathBuf,
    pub line: u64,
    pub column: &'static str,
    pub value: String,
    pub reason: String,
}

/// Errors raised while reading a record set from disk.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed row in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Rejected filter input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// A label that does not name any known category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct LabelError {
    pub kind: &'static str,
    pub value: String,
}
