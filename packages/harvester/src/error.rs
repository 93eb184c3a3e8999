//! Error types for the harvester.
//!
//! Uses the dual-error pattern: `HarvesterError` for library consumers
//! with detailed error context, and [`FetchError`] for document retrieval,
//! whose kind tells callers whether a retry could help.

use std::path::PathBuf;

use ecfr_wordcount::WordCountError;
use thiserror::Error;

use crate::fetch::FetchError;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid CFR title number.
    #[error("Invalid title: '{0}'. Expected a number from 1 to 50")]
    InvalidTitle(String),

    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2024-01-01)")]
    InvalidDate(String),

    /// HTTP client could not be built or a request failed outright.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Document retrieval failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// JSON (de)serialization failed.
    #[error("JSON processing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be turned into records.
    #[error(transparent)]
    WordCount(#[from] WordCountError),

    /// The eCFR API answered with something unusable.
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// No stored documents to process.
    #[error("No title documents found in {}", .0.display())]
    NoDocuments(PathBuf),

    /// Every document of a batch failed.
    #[error("All {0} documents failed")]
    AllFailed(usize),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
