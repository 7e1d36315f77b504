// src/collector/error.rs
use reqwest::StatusCode;

/// Failure to obtain pool facts. Always reported as UNKNOWN.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("No JSON object could be decoded")]
    Decode(#[from] serde_json::Error),

    #[error("statistics payload is missing {0}")]
    MissingField(String),

    #[error("invalid management address: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CollectionError {
    /// Whether a repeat of the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CollectionError::Transport { .. } => true,
            CollectionError::HttpStatus { status, .. } => {
                crate::retry::RetryStrategy::is_retryable_status(*status).is_retry()
            }
            _ => false,
        }
    }
}
