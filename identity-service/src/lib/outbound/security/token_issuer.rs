use std::sync::Arc;

use auth::Claims;
use auth::JwtHandler;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::authentication::errors::TokenError;
use crate::domain::authentication::models::access_token_lifetime;
use crate::domain::authentication::models::AuthToken;
use crate::domain::authentication::ports::TokenIssuer;
use crate::domain::user::models::User;

/// Claim carrying the numeric user id.
pub const USER_ID_CLAIM: &str = "userId";
/// Claim carrying the user's email.
pub const EMAIL_CLAIM: &str = "email";
/// Claim carrying the user's display name.
pub const NAME_CLAIM: &str = "name";

/// Signs access tokens with the shared [`JwtHandler`].
///
/// The subject is the user's email; id, email and name travel as extra claims.
pub struct JwtTokenIssuer {
    handler: Arc<JwtHandler>,
    issuer: String,
}

impl JwtTokenIssuer {
    pub fn new(handler: Arc<JwtHandler>, issuer: impl Into<String>) -> Self {
        Self {
            handler,
            issuer: issuer.into(),
        }
    }

    fn claims_for(&self, user: &User, now: DateTime<Utc>) -> Claims {
        Claims::for_subject(user.email.as_str(), now, access_token_lifetime())
            .with_issuer(&self.issuer)
            .with_extra(USER_ID_CLAIM, user.id.0)
            .with_extra(EMAIL_CLAIM, user.email.as_str())
            .with_extra(NAME_CLAIM, &user.name)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AuthToken, TokenError> {
        let claims = self.claims_for(user, now);

        self.handler
            .encode(&claims)
            .map(AuthToken::new)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }
}
