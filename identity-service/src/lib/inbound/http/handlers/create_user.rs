use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use super::ValidationErrors;
use crate::domain::user::models::parse_name;
use crate::domain::user::models::parse_password;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Login;
use crate::inbound::http::router::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
///
/// Missing and `null` fields are reported by validation as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    name: Option<String>,
    email: Option<String>,
    login: Option<String>,
    password: Option<String>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = errors.check("name", parse_name(self.name.unwrap_or_default()));
        let email = errors.check(
            "email",
            EmailAddress::parse(self.email.unwrap_or_default()),
        );
        let login = errors.check("login", Login::parse(self.login.unwrap_or_default()));
        let password = errors.check(
            "password",
            parse_password(self.password.unwrap_or_default()),
        );

        match (name, email, login, password) {
            (Some(name), Some(email), Some(login), Some(password)) => {
                Ok(CreateUserCommand::new(name, email, login, password))
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_field_errors_are_collected() {
        let request = CreateUserRequest {
            name: Some(" ".to_string()),
            email: Some("nope".to_string()),
            login: Some("ana".to_string()),
            password: Some("short".to_string()),
        };

        let errors = request.try_into_command().unwrap_err();

        let fields: Vec<_> = errors.0.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "email", "login", "password"]);
    }

    #[test]
    fn test_valid_request_becomes_command() {
        let request = CreateUserRequest {
            name: Some("Ana".to_string()),
            email: Some("ana@x.com".to_string()),
            login: Some("anana".to_string()),
            password: Some("secret123".to_string()),
        };

        let command = request.try_into_command().unwrap();

        assert_eq!(command.email.as_str(), "ana@x.com");
        assert_eq!(command.login.as_str(), "anana");
    }

    #[test]
    fn test_null_fields_are_blank() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"name": null, "email": "ana@x.com", "login": "anana", "password": null}"#,
        )
        .unwrap();

        let errors = request.try_into_command().unwrap_err();

        let fields: Vec<_> = errors.0.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "password"]);
        assert!(errors.0.iter().all(|e| e.message == "must not be blank"));
    }
}
