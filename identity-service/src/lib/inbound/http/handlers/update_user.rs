use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use super::ValidationErrors;
use crate::domain::user::models::parse_password;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Login;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a user (raw JSON)
///
/// All three fields are required; the password is always replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    email: Option<String>,
    login: Option<String>,
    password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let email = errors.check(
            "email",
            EmailAddress::parse(self.email.unwrap_or_default()),
        );
        let login = errors.check("login", Login::parse(self.login.unwrap_or_default()));
        let password = errors.check(
            "password",
            parse_password(self.password.unwrap_or_default()),
        );

        match (email, login, password) {
            (Some(email), Some(login), Some(password)) => {
                Ok(UpdateUserCommand::new(email, login, password))
            }
            _ => Err(errors),
        }
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let Json(req) = payload?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_fields_are_reported() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"email": null, "login": "anana"}"#).unwrap();

        let errors = request.try_into_command().unwrap_err();

        let fields: Vec<_> = errors.0.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "password"]);
    }

    #[test]
    fn test_valid_request_becomes_command() {
        let request = UpdateUserRequest {
            email: Some("ana@y.com".to_string()),
            login: Some("ana_two".to_string()),
            password: Some("newpass12".to_string()),
        };

        let command = request.try_into_command().unwrap();

        assert_eq!(command.email.as_str(), "ana@y.com");
        assert_eq!(command.login.as_str(), "ana_two");
    }
}
