//! Handlers for the authenticated short link endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::api::dto::links::{AnalyticsDto, CreateLinkRequest, SearchParams, ShortLinkDto};
use crate::api::dto::ApiResponse;
use crate::api::middleware::auth::AuthUser;
use crate::application::services::link_service::CreateLinkData;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /pvt/`
///
/// Creates a short link owned by the authenticated user.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(
            auth.user_id,
            CreateLinkData {
                long_url: payload.long_url,
                custom_code: payload.custom_url,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Short URL created successfully",
            ShortLinkDto::from(link),
        )),
    ))
}

/// `GET /pvt/`
///
/// Lists the user's links, newest first.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let links = state.link_service.list_for_owner(auth.user_id).await?;

    let items: Vec<ShortLinkDto> = links.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok("URLs fetched successfully", items)))
}

/// `GET /pvt/search?query=...`
pub async fn search_links_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let links = state
        .link_service
        .search(auth.user_id, &params.query)
        .await?;

    let items: Vec<ShortLinkDto> = links.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok("URLs fetched successfully", items)))
}

/// `GET /pvt/analytics/{urlId}`
///
/// Aggregated click statistics for one of the user's links.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(url_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let analytics = state.link_service.analytics(auth.user_id, url_id).await?;

    Ok(Json(ApiResponse::ok(
        "Analytics fetched successfully",
        AnalyticsDto::from(analytics),
    )))
}
