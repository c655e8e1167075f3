//! Error types shared across the feescan crates.

use thiserror::Error;

use crate::request::GraphQlError;

/// Errors that can occur while talking to a GraphQL endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, reset, non-2xx status, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The endpoint answered but reported GraphQL errors.
    #[error("GraphQL error: {}", first_message(.0))]
    GraphQl(Vec<GraphQlError>),

    /// A batch answer did not pair one-to-one with the submitted queries.
    #[error("Batch size mismatch: sent {sent} queries, got {received} responses")]
    BatchMismatch { sent: usize, received: usize },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

fn first_message(errors: &[GraphQlError]) -> String {
    match errors {
        [] => "no error details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first.message, rest.len()),
    }
}

impl TransportError {
    /// Returns `true` if this error is transient and the request may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}

/// Errors raised when validating a [`crate::ScanConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid height range: end {end} is before start {start}")]
    InvalidRange { start: u64, end: u64 },

    #[error("batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("window_size must be at least 1")]
    ZeroWindowSize,

    #[error("endpoint URL is empty")]
    MissingEndpoint,
}

/// Errors raised while turning a matched attribute run into a fee record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
    #[error("Invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Match has no attribute at position {index}")]
    MissingAttribute { index: usize },
}
