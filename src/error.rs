//! Error types for reading, series processing and downloading.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to parse a fixed-width or delimited record.
#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("Line is too short: expected at least {expected} characters, got {found}")]
    LineTooShort { expected: usize, found: usize },

    #[error("Invalid {field} `{value}`")]
    InvalidField { field: &'static str, value: String },

    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {message}")]
    Line { line: usize, message: String },

    #[error("Failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse CSV")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Invalid input to a series operation.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("Series index is not ordered: {next} follows {previous}")]
    Unordered {
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("Rolling window must be at least {minimum}, got {window}")]
    WindowTooSmall { window: usize, minimum: usize },

    #[error("Unknown resample rule `{0}`")]
    UnknownRule(String),

    #[error("Unknown aggregation `{0}`")]
    UnknownAggregation(String),

    #[error("Non-finite value at {0}")]
    NonFinite(NaiveDate),
}

/// Failure to fetch a remote file into the cache.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network request failed for {0}")]
    Request(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to write cache file `{0}`")]
    CacheWrite(PathBuf, #[source] std::io::Error),
}

/// Failure to build or render a figure.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Invalid line style `{0}`")]
    InvalidStyle(String),

    #[error("Nothing to plot for `{0}`")]
    EmptySeries(String),

    #[error("Failed to create output directory `{0}`")]
    OutputDir(PathBuf, #[source] std::io::Error),

    #[error("Failed to draw `{title}`: {message}")]
    Draw { title: String, message: String },
}
