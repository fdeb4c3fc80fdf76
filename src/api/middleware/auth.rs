//! Cookie-based access token authentication middleware.
//!
//! The access token travels in the `x-access-token` HTTP-only cookie. On
//! success the verified identity is inserted as an [`AuthUser`] request
//! extension for handlers to read.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::application::services::token_service::{TokenError, TokenKind};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookies::ACCESS_TOKEN_COOKIE;

/// The authenticated identity of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

/// Authenticates requests using the access token cookie.
///
/// # Errors
///
/// Returns `401 Unauthorized` when the cookie is missing, the token is
/// expired, or the signature does not verify. An expired token gets a
/// distinct message so clients know to call the refresh endpoint.
pub async fn layer(
    State(st): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::unauthorized("Token missing", json!({})))?;

    let payload = st
        .token_service
        .verify(&token, TokenKind::Access)
        .map_err(|e| match e {
            TokenError::Expired => AppError::unauthorized("Token expired", json!({})),
            TokenError::Invalid => AppError::unauthorized("Token invalid", json!({})),
        })?;

    req.extensions_mut().insert(AuthUser {
        user_id: payload.user_id,
        email: payload.email,
    });

    Ok(next.run(req).await)
}
