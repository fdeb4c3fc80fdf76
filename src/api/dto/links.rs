//! DTOs for the short link endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::link_service::LinkAnalytics;
use crate::domain::entities::Link;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "URL is required"))]
    pub long_url: String,

    /// Optional custom short code; stored lowercased.
    #[validate(length(min = 3, max = 30, message = "Custom URL must be 3-30 characters"))]
    #[validate(regex(
        path = "*CUSTOM_CODE_REGEX",
        message = "Custom URL can only contain letters, numbers, hyphens, or underscores"
    ))]
    pub custom_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkDto {
    pub id: i64,
    pub long_url: String,
    pub short_code: String,
    pub custom_code: bool,
    pub full_short_url: String,
    pub qr_code: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Link> for ShortLinkDto {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            long_url: link.long_url,
            short_code: link.short_code,
            custom_code: link.custom_code,
            full_short_url: link.full_short_url,
            qr_code: link.qr_code,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDto {
    pub total_clicks: u64,
    pub clicks_by_date: BTreeMap<String, u64>,
    pub browsers: BTreeMap<String, u64>,
    pub countries: BTreeMap<String, u64>,
    pub referrers: BTreeMap<String, u64>,
}

impl From<LinkAnalytics> for AnalyticsDto {
    fn from(analytics: LinkAnalytics) -> Self {
        Self {
            total_clicks: analytics.total_clicks,
            clicks_by_date: analytics.clicks_by_date,
            browsers: analytics.browsers,
            countries: analytics.countries,
            referrers: analytics.referrers,
        }
    }
}
