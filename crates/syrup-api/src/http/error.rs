//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use syrup_types::error::{AuthError, RepositoryError, TokenError};

/// Application-level error that maps to HTTP responses.
///
/// Internal detail (SQL text, token parse errors) never reaches the
/// body; clients get a stable code and a short message.
#[derive(Debug)]
pub enum AppError {
    /// Registration/login errors.
    Auth(AuthError),
    /// Session token errors.
    Token(TokenError),
    /// Storage errors.
    Repository(RepositoryError),
    /// Authentication failure outside the auth service.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Missing resource.
    NotFound(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::Token(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(AuthError::LoginTaken(login)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Login '{login}' is already taken"),
            ),
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_ERROR",
                "Invalid login or password".to_string(),
            ),
            AppError::Auth(AuthError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Storage failure".to_string(),
            ),
            AppError::Auth(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal error".to_string(),
            ),
            AppError::Token(TokenError::Expired) => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_ERROR",
                "Session expired".to_string(),
            ),
            AppError::Token(_) => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_ERROR",
                "Invalid session token".to_string(),
            ),
            AppError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string())
            }
            AppError::Repository(RepositoryError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Storage failure".to_string(),
            ),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::LoginTaken("a".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn token_errors_are_unauthorized() {
        assert_eq!(
            status_of(AppError::Token(TokenError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Token(TokenError::Invalid)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn storage_failure_is_opaque() {
        let resp = AppError::Repository(RepositoryError::Query(
            "UNIQUE constraint failed: users.login".into(),
        ))
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
