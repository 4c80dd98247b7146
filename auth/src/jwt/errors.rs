use thiserror::Error;

/// Error type for JWT operations.
///
/// Expiry is deliberately absent: an expired but well-formed token still
/// decodes, and callers decide what expiry means for them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),
}
