//! Errors raised while fetching from Hive.

use feescan_core::error::TransportError;
use feescan_core::types::Height;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HiveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Hive answered the query for `height` with GraphQL errors.
    #[error("Query for height {height} failed: {message}")]
    Query { height: Height, message: String },

    /// The answer for `height` did not have the expected shape.
    #[error("Unexpected response for height {height}: {reason}")]
    Decode { height: Height, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
