//! Error types for the pain index

use thiserror::Error;

/// Errors that make a provider unavailable for the current refresh
///
/// The provider chain treats every variant the same way: it logs the failure
/// and falls through to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid or unparseable response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider answered successfully but with no usable records
    #[error("Empty payload from {0}")]
    EmptyPayload(&'static str),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider API error (non-success HTTP status)
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,
}

impl ProviderError {
    /// Classifies a failed request, keeping client-side timeouts distinct
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }
}

/// Errors raised while turning a raw provider record into an asset
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A mandatory identity field is absent or empty
    #[error("Malformed record: missing {0}")]
    MissingField(&'static str),
}
