use auth::Claims;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::outbound::security::token_issuer::USER_ID_CLAIM;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: EmailAddress,
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}

/// Middleware that validates bearer tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims: Claims = state.jwt_handler.decode(token).map_err(|e| {
        match e {
            JwtError::TokenExpired => tracing::debug!("Rejected expired token"),
            other => tracing::warn!(error = %other, "JWT validation failed"),
        }
        unauthorized("Invalid or expired token")
    })?;

    let (Some(email), Some(user_id)) = (claims.sub.as_deref(), claims.extra_i64(USER_ID_CLAIM))
    else {
        tracing::warn!("Token is missing subject or user id claim");
        return Err(unauthorized("Invalid token format"));
    };

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(user_id),
        email: EmailAddress::new(email),
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}
