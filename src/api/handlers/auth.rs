//! Handlers for the authentication endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, RegisterRequest, RegisteredDto, ResendOtpRequest, UserDto, VerifyOtpRequest,
};
use crate::api::dto::ApiResponse;
use crate::api::middleware::auth::AuthUser;
use crate::application::services::auth_service::RegisterData;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookies::{
    clear_token_cookies, set_token_cookies, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};

fn with_session_cookies(
    state: &AppState,
    jar: CookieJar,
    tokens: &crate::application::services::token_service::TokenPair,
) -> CookieJar {
    set_token_cookies(
        jar,
        tokens,
        state.token_service.access_ttl_secs(),
        state.token_service.refresh_ttl_secs(),
        state.cookie_secure,
    )
}

/// `POST /auth/register`
///
/// Creates an unverified account and emails a verification code. The
/// returned user id is needed for the verify step.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(RegisterData {
            name: payload.name,
            email: payload.email,
            phone_number: payload.phone_number,
            password: payload.password,
            photo_base64: payload.photo_base64,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User registered. OTP sent to your email",
            RegisteredDto {
                user_id: user.id,
                email: user.email,
            },
        )),
    ))
}

/// `POST /auth/verify-otp`
///
/// Confirms the account and opens the first session: both credential
/// cookies are set on success.
pub async fn verify_otp_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, tokens) = state
        .auth_service
        .verify_otp(payload.user_id, &payload.otp)
        .await?;

    let jar = with_session_cookies(&state, jar, &tokens);

    Ok((
        jar,
        Json(ApiResponse::ok(
            "Email verified successfully",
            UserDto::from(user),
        )),
    ))
}

/// `POST /auth/resend-otp`
///
/// Re-sends the verification code. Responds with success for unknown emails
/// too, so accounts cannot be enumerated.
pub async fn resend_otp_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResendOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    state.auth_service.resend_otp(&payload.email).await?;

    Ok(Json(ApiResponse::message("OTP sent to your email")))
}

/// `POST /auth/login`
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, tokens) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    let jar = with_session_cookies(&state, jar, &tokens);

    Ok((
        jar,
        Json(ApiResponse::ok("Login successful", UserDto::from(user))),
    ))
}

/// `POST /auth/refresh-token`
///
/// Rotates the session's token pair when the access token has expired. A
/// still-valid access token is a no-op.
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let access = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string());
    let refresh = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string());

    match state
        .auth_service
        .refresh(access.as_deref(), refresh.as_deref())
        .await?
    {
        Some(tokens) => {
            let jar = with_session_cookies(&state, jar, &tokens);
            Ok((jar, Json(ApiResponse::message("Token refreshed"))))
        }
        None => Ok((jar, Json(ApiResponse::message("Access token is still valid")))),
    }
}

/// `POST /auth/logout`
///
/// Invalidates the stored refresh token and clears both cookies.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(auth.user_id).await?;

    let jar = clear_token_cookies(jar);

    Ok((jar, Json(ApiResponse::message("Logged out successfully"))))
}

/// `GET /pvt/me`
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.get_me(auth.user_id).await?;

    Ok(Json(ApiResponse::ok(
        "User fetched successfully",
        UserDto::from(user),
    )))
}
