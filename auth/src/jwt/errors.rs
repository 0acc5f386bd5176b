use thiserror::Error;

use super::claims::TokenPurpose;

/// Error type for JWT operations.
///
/// Each validation failure is its own variant so callers can log the precise
/// reason while answering clients with a single generic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Signing secret is missing or empty")]
    MissingSecret,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token issuer does not match")]
    IssuerMismatch,

    #[error("Token audience does not match")]
    AudienceMismatch,

    #[error("Token was issued for {actual}, expected {expected}")]
    PurposeMismatch {
        expected: TokenPurpose,
        actual: TokenPurpose,
    },

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
