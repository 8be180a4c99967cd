use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::user::ports::CredentialHasher;
use crate::user::errors::HasherError;

/// Argon2id implementation of the credential hasher port.
#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher {
    inner: PasswordHasher,
}

impl Argon2CredentialHasher {
    pub fn new(inner: PasswordHasher) -> Self {
        Self { inner }
    }
}

impl From<PasswordError> for HasherError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::MalformedHash(msg) => HasherError::MalformedHash(msg),
            PasswordError::HashingFailed(msg) | PasswordError::InvalidParameters(msg) => {
                HasherError::HashingFailed(msg)
            }
        }
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HasherError> {
        Ok(self.inner.hash(plaintext)?)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HasherError> {
        Ok(self.inner.verify(plaintext, digest)?)
    }
}
