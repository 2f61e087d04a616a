//! Error taxonomy for the aggregation core.
//!
//! Only [`AggregateError`] ever leaves [`crate::aggregator::Aggregator::aggregate`].
//! [`AdapterError`] is produced inside the source adapters and is always
//! recovered at the [`crate::sources::SourceAdapter::fetch`] boundary: it is
//! logged and the adapter contributes an empty list for that call.

use std::time::Duration;
use thiserror::Error;

/// Failures that cross the core boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// The caller supplied no usable topics or malformed parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Every window and every source came back without a usable article.
    #[error("no articles found for {topics:?}; try different or broader topics")]
    NoArticlesFound { topics: Vec<String> },
}

impl AggregateError {
    /// Whether the caller can reasonably try again (with other topics).
    ///
    /// `InvalidRequest` is a caller bug and retrying the same input is pointless.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AggregateError::NoArticlesFound { .. })
    }
}

/// A single adapter call that failed. Never propagated past the adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("expected JSON but got content-type {content_type:?}: {preview}")]
    UnexpectedContentType { content_type: String, preview: String },

    #[error("provider reported an error: {0}")]
    Provider(String),

    #[error("no API credential configured")]
    MissingCredential,
}

/// Failures while loading configuration or building HTTP clients.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
