//! Public redirect handler.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use std::net::SocketAddr;

use crate::application::services::link_service::ClickMetadata;
use crate::error::AppError;
use crate::state::AppState;

/// Best-effort client IP: the first `X-Forwarded-For` entry when present,
/// otherwise the socket peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `GET /s/{code}`
///
/// Resolves the short code (case-insensitively) and answers with a
/// `302 Found` to the stored target. The visit is recorded as a side effect.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let peer = connect_info.map(|Extension(ConnectInfo(addr))| addr);
    let metadata = ClickMetadata {
        referrer: header_str(&headers, header::REFERER),
        user_agent: header_str(&headers, header::USER_AGENT),
        ip: client_ip(&headers, peer),
    };

    let target = state.link_service.resolve(&code, metadata).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
