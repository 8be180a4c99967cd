use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ValidationErrors;
use crate::domain::authentication::models::AuthToken;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Body shared by the login and password change endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("must not be blank")]
struct BlankPassword;

impl CredentialsRequest {
    /// Validate the email format and that a password was supplied.
    pub(super) fn try_into_parts(self) -> Result<(EmailAddress, String), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let email = errors.check(
            "email",
            EmailAddress::parse(self.email.unwrap_or_default()),
        );
        let password = errors.check(
            "password",
            self.password
                .filter(|password| !password.trim().is_empty())
                .ok_or(BlankPassword),
        );

        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(errors),
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload?;
    let (email, password) = body.try_into_parts()?;

    state
        .auth_service
        .login(&email, &password)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub access_token: String,
    pub expires_in: i64,
}

impl From<AuthToken> for LoginResponseData {
    fn from(token: AuthToken) -> Self {
        Self {
            access_token: token.access_token,
            expires_in: token.expires_in,
        }
    }
}
