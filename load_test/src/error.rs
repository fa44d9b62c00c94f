//! Error types for load test setup and reporting.
//!
//! Iteration-level failures (transport errors, unexpected status codes) are
//! never surfaced through these types; they only show up as failing checks.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or finishing a load test run.
#[derive(Debug, Error)]
pub enum LoadTestError {
    /// The requested run plan cannot be executed
    #[error("Invalid run plan: {0}")]
    InvalidPlan(String),

    /// Threshold value outside of 0.0..=1.0
    #[error("Invalid checks threshold {0}: expected a rate between 0.0 and 1.0")]
    InvalidThreshold(f64),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Writing the summary file failed
    #[error("Failed to write summary to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Summary serialization failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadTestError>;
