use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::login::CredentialsRequest;
use super::ApiError;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = payload?;
    let (email, password) = body.try_into_parts()?;

    tracing::info!(caller = %caller.user_id, target = %email, "Password change requested");

    state.auth_service.update_password(&email, &password).await?;

    Ok(StatusCode::NO_CONTENT)
}
