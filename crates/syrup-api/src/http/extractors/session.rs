//! Cookie session extractor.
//!
//! Extracting `CurrentUser` validates the access token cookie against
//! the token service. Refresh tokens are rejected here; they are only
//! accepted by the refresh endpoint.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use syrup_types::auth::TokenKind;
use syrup_types::user::UserId;

use crate::http::cookies::cookie_value;
use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated user behind the request's access cookie.
pub struct CurrentUser {
    pub id: UserId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = access_token(parts, &state.config.access_cookie_name)?;

        let claims = state.tokens.validate(&token)?;
        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthorized(
                "Refresh token is not valid for requests".to_string(),
            ));
        }

        Ok(CurrentUser { id: claims.subject })
    }
}

fn access_token(parts: &Parts, cookie_name: &str) -> Result<String, AppError> {
    let header = parts
        .headers
        .get(COOKIE)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Cookie header encoding".to_string()))?;

    cookie_value(header, cookie_name)
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
}
