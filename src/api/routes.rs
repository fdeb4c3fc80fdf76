//! API route configuration.

use crate::api::handlers::{
    analytics_handler, create_link_handler, list_links_handler, login_handler, logout_handler,
    me_handler, refresh_token_handler, register_handler, resend_otp_handler, search_links_handler,
    verify_otp_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Authentication routes.
///
/// # Endpoints
///
/// - `POST /register`      - Create an unverified account, dispatch OTP
/// - `POST /verify-otp`    - Confirm the account, open the first session
/// - `POST /resend-otp`    - Re-dispatch the verification code
/// - `POST /login`         - Open a session for a verified account
/// - `POST /refresh-token` - Rotate the token pair (cookies only, no body)
/// - `POST /logout`        - Close the session (requires a valid access token)
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let logout = Router::new()
        .route("/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer));

    Router::new()
        .route("/register", post(register_handler))
        .route("/verify-otp", post(verify_otp_handler))
        .route("/resend-otp", post(resend_otp_handler))
        .route("/login", post(login_handler))
        .route("/refresh-token", post(refresh_token_handler))
        .merge(logout)
}

/// Link management routes, all requiring cookie authentication.
///
/// # Endpoints
///
/// - `POST /`                  - Create a short link
/// - `GET  /`                  - List the user's links
/// - `GET  /search?query=...`  - Search the user's links
/// - `GET  /analytics/{urlId}` - Click statistics for one link
/// - `GET  /me`                - Current account profile
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_link_handler).get(list_links_handler))
        .route("/search", get(search_links_handler))
        .route("/analytics/{url_id}", get(analytics_handler))
        .route("/me", get(me_handler))
}
