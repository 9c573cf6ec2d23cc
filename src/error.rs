//! Error types surfaced by the rater library.

use thiserror::Error;

/// Errors returned to callers of the fetcher, cache, and services.
///
/// Per-year data problems never show up here: a missing year, a bad payload,
/// or a quota signal only shortens the collected series.
#[derive(Debug, Error)]
pub enum RaterError {
    /// The caller asked for a walk that cannot be performed.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A single-shot batch read did not succeed.
    #[error("batch request to '{path}' failed: {reason}")]
    Batch { path: String, reason: String },

    /// A service request (boundaries, etc.) did not succeed.
    #[error("request to '{path}' failed: {reason}")]
    Request { path: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RaterError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Convenience result alias.
pub type RaterResult<T> = std::result::Result<T, RaterError>;
