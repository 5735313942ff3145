//! Ledger client error definitions.

use thiserror::Error;

/// Errors that can occur while reading the ledger.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Endpoint URL could not be parsed.
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request timed out.
    #[error("Ledger request timed out after {0} seconds")]
    Timeout(u64),

    /// The endpoint answered with an unexpected status.
    #[error("Ledger returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// The response body was not what the endpoint promises.
    #[error("Invalid ledger response: {0}")]
    Decode(String),

    /// Every configured endpoint failed.
    #[error("All ledger endpoints failed for {0}")]
    AllEndpointsFailed(String),
}

/// Result type for ledger operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
