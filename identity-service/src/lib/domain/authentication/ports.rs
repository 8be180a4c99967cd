use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::errors::TokenError;
use crate::domain::authentication::models::AuthToken;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `email` - Login email, matched exactly
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed token valid for one hour
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Token` - Token signing failed
    /// * `Hashing` - Stored hash is corrupt
    /// * `Internal` - Storage failure
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<AuthToken, AuthError>;

    /// Replace the password of the user owning `email`.
    ///
    /// The current password is not checked; the caller is trusted to have
    /// authorized the change.
    ///
    /// # Errors
    /// * `NotFound` - No user has this email
    /// * `Hashing` - Password could not be hashed
    /// * `Internal` - Storage failure
    async fn update_password(&self, email: &EmailAddress, new_password: &str)
        -> Result<(), AuthError>;
}

/// Builds and signs access tokens.
pub trait TokenIssuer: Send + Sync + 'static {
    /// Issue a token for `user`, valid from `now` for the standard lifetime.
    ///
    /// # Errors
    /// * `SigningFailed` - Claims could not be signed
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AuthToken, TokenError>;
}
