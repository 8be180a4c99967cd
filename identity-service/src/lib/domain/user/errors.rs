use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("must not be blank")]
    Blank,

    #[error("must be a well-formed email address: {0}")]
    InvalidFormat(String),
}

/// Error for Login validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("size must be between {min} and {max}, got {actual}")]
    InvalidLength { min: usize, max: usize, actual: usize },
}

/// Error for display name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("must not be blank")]
    Blank,
}

/// Error for plaintext password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("must not be blank")]
    Blank,

    #[error("size must be between {min} and {max}, got {actual}")]
    InvalidLength { min: usize, max: usize, actual: usize },
}

/// Error raised by a credential hasher
#[derive(Debug, Clone, Error)]
pub enum HasherError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Top-level error for user directory operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Credential hashing error: {0}")]
    Hashing(#[from] HasherError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
