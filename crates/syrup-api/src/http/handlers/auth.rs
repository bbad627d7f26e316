//! Account and session handlers.
//!
//! Sessions are carried by two `HttpOnly` cookies: the short-lived
//! access token and the longer-lived refresh token. Register and
//! login bind both; refresh rebinds only the access cookie; logout
//! clears both without revoking anything.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use serde::Deserialize;

use syrup_types::auth::TokenPair;
use syrup_types::user::UserProfile;

use crate::http::cookies::{clear_cookie, cookie_value, session_cookie};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// JSON body for register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub login: String,
    pub password: String,
}

impl CredentialsRequest {
    fn validated(&self) -> Result<(&str, &str), AppError> {
        let login = self.login.trim();
        if login.is_empty() {
            return Err(AppError::Validation("login must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        Ok((login, &self.password))
    }
}

fn session_headers(state: &AppState, pair: &TokenPair) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    let config = &state.config;
    AppendHeaders([
        (
            SET_COOKIE,
            session_cookie(
                &config.access_cookie_name,
                &pair.access,
                config.access_ttl_seconds(),
            ),
        ),
        (
            SET_COOKIE,
            session_cookie(
                &config.refresh_cookie_name,
                &pair.refresh,
                config.refresh_ttl_seconds(),
            ),
        ),
    ])
}

/// POST /api/v1/auth/register - Create an account and start a session.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();
    let (login, password) = body.validated()?;

    let (user, pair) = state.auth_service.register(login, password).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok((
        session_headers(&state, &pair),
        ApiResponse::success(UserProfile::from(&user), elapsed),
    ))
}

/// POST /api/v1/auth/login - Authenticate and start a session.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();
    let (login, password) = body.validated()?;

    let (user, pair) = state.auth_service.login(login, password).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok((
        session_headers(&state, &pair),
        ApiResponse::success(UserProfile::from(&user), elapsed),
    ))
}

/// POST /api/v1/auth/refresh - Exchange the refresh cookie for a new
/// access cookie.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();

    let refresh_token = headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| cookie_value(h, &state.config.refresh_cookie_name))
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".to_string()))?
        .to_string();

    let access = state.tokens.refresh(&refresh_token)?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok((
        AppendHeaders([(
            SET_COOKIE,
            session_cookie(
                &state.config.access_cookie_name,
                &access,
                state.config.access_ttl_seconds(),
            ),
        )]),
        ApiResponse::success(serde_json::json!({ "status": "refreshed" }), elapsed),
    ))
}

/// POST /api/v1/auth/logout - Clear both session cookies.
///
/// Previously issued tokens stay valid until expiry; only the
/// transport binding is removed.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (SET_COOKIE, clear_cookie(&state.config.access_cookie_name)),
            (SET_COOKIE, clear_cookie(&state.config.refresh_cookie_name)),
        ]),
    )
}
