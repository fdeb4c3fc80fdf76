//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /s/{code}` - Short link redirect (public)
//! - `GET /health`   - Health check (public)
//! - `/auth/*`       - Registration, verification and session endpoints
//! - `/pvt/*`        - Link management (access token cookie required)
//! - `/static/*`     - Static assets, including uploaded profile photos
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on credential routes
//! - **Authentication** - Access token cookie on `/pvt` and logout
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{middleware, Router};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router.
///
/// `rate_limit_enabled` switches the per-IP limiters off; integration tests
/// drive the router without socket peer addresses, which the limiter's key
/// extractor needs.
pub fn router(state: AppState, rate_limit_enabled: bool) -> Router {
    let mut auth_router = api::routes::auth_routes(state.clone());
    let mut pvt_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let mut public = Router::new().route("/s/{code}", get(redirect_handler));

    if rate_limit_enabled {
        auth_router = auth_router.layer(rate_limit::auth_layer());
        pvt_router = pvt_router.layer(rate_limit::layer());
        public = public.layer(rate_limit::layer());
    }

    Router::new()
        .merge(public)
        .route("/health", get(health_handler))
        .nest("/auth", auth_router)
        .nest("/pvt", pvt_router)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer())
}

/// The full application service with path normalization applied.
pub fn app_router(state: AppState, rate_limit_enabled: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, rate_limit_enabled))
}
