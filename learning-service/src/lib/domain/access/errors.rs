use thiserror::Error;

use crate::identity::errors::IdentityError;

/// Errors surfaced by authentication flows.
///
/// Deliberately coarse: which token check failed, or whether an email exists,
/// is logged but never carried in these variants.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthenticated,

    #[error("Invalid or expired token.")]
    InvalidResetToken,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<IdentityError> for AccessError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailAlreadyExists(_) => AccessError::EmailAlreadyExists,
            IdentityError::RoleNotAssignable
            | IdentityError::InvalidRole(_)
            | IdentityError::InvalidName(_)
            | IdentityError::InvalidEmail(_)
            | IdentityError::InvalidIdentityId(_) => AccessError::InvalidArgument(err.to_string()),
            other => AccessError::Internal(other.to_string()),
        }
    }
}

impl From<auth::JwtError> for AccessError {
    fn from(err: auth::JwtError) -> Self {
        AccessError::Internal(format!("Token generation failed: {}", err))
    }
}
