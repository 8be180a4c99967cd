use chrono::Duration;

/// Lifetime of every issued access token, in seconds.
pub const ACCESS_TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// Lifetime of every issued access token.
pub fn access_token_lifetime() -> Duration {
    Duration::seconds(ACCESS_TOKEN_LIFETIME_SECONDS)
}

/// Signed bearer credential returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    pub expires_in: i64,
}

impl AuthToken {
    /// Wrap a signed token issued with the standard lifetime.
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            expires_in: ACCESS_TOKEN_LIFETIME_SECONDS,
        }
    }
}
