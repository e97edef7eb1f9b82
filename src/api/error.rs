use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one external lookup. Callers log it and carry on with no results.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned status {0}")]
    BadStatus(StatusCode),

    /// The body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
