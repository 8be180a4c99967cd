use thiserror::Error;

use crate::user::errors::HasherError;
use crate::user::errors::UserError;

/// Error raised when a token cannot be produced
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

/// Top-level error for authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Both cases share this variant so
    /// callers cannot tell which one occurred.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found with email: {0}")]
    NotFound(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Credential hashing error: {0}")]
    Hashing(#[from] HasherError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Hashing(e) => AuthError::Hashing(e),
            UserError::NotFound(who) => AuthError::NotFound(who),
            other => AuthError::Internal(other.to_string()),
        }
    }
}
