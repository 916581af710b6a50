//! Error types for the forum API client.
//!
//! # Design
//! Nothing inside the client catches or recovers from these; every failure
//! reaches the caller. Status-bearing variants keep the request URL so a
//! failure printed from `main` says which endpoint misbehaved.

use thiserror::Error;

/// Errors returned by `ForumClient` and `Session`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status that is not retryable.
    #[error("HTTP {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    /// Every attempt allowed by the retry policy returned a retryable status.
    #[error("HTTP {status} for {url} after {attempts} attempts")]
    RetriesExhausted { url: String, status: u16, attempts: u32 },

    /// DNS, connect, TLS or I/O failure below the HTTP layer.
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The body was JSON but did not have the shape of the expected record.
    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The body was not JSON at all.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::RetriesExhausted { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
