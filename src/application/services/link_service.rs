//! Short link creation, redirect resolution and analytics.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::ports::{GeoLookup, QrGenerator};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, normalize_code, validate_custom_code};
use crate::utils::url_normalizer::{is_valid_redirect_target, normalize_long_url};

/// How many generated codes to try before giving up on creation.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Input data for creating a short link.
#[derive(Debug, Clone)]
pub struct CreateLinkData {
    pub long_url: String,
    pub custom_code: Option<String>,
}

/// Request metadata captured on a redirect hit.
#[derive(Debug, Clone)]
pub struct ClickMetadata {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: String,
}

/// Aggregated click statistics for one link.
///
/// Maps are ordered so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAnalytics {
    pub total_clicks: u64,
    pub clicks_by_date: BTreeMap<String, u64>,
    pub browsers: BTreeMap<String, u64>,
    pub countries: BTreeMap<String, u64>,
    pub referrers: BTreeMap<String, u64>,
}

pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    qr_generator: Arc<dyn QrGenerator>,
    geo_lookup: Arc<dyn GeoLookup>,
    base_url: String,
}

impl LinkService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        qr_generator: Arc<dyn QrGenerator>,
        geo_lookup: Arc<dyn GeoLookup>,
        base_url: String,
    ) -> Self {
        Self {
            link_repository,
            qr_generator,
            geo_lookup,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link for the user.
    ///
    /// The long URL is normalized first (scheme-less input gets `https://`).
    /// A custom code is validated, lowercased and checked for availability;
    /// otherwise a random code is generated, retrying on collision. The QR
    /// image is produced before persisting, so a link is never stored without
    /// its QR artifact.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed long URL or custom code
    /// - [`AppError::Conflict`] when the custom code is taken
    /// - [`AppError::Dependency`] when QR generation fails
    pub async fn create_short_link(
        &self,
        user_id: i64,
        data: CreateLinkData,
    ) -> Result<Link, AppError> {
        let long_url = normalize_long_url(&data.long_url)
            .map_err(|e| AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() })))?;

        let (short_code, custom_code) = match &data.custom_code {
            Some(code) => {
                validate_custom_code(code)?;
                let code = code.to_ascii_lowercase();
                if self.link_repository.find_by_code(&code).await?.is_some() {
                    return Err(AppError::conflict(
                        "This custom URL already exists",
                        json!({ "custom_code": code }),
                    ));
                }
                (code, true)
            }
            None => (self.generate_unique_code().await?, false),
        };

        let full_short_url = format!("{}/s/{}", self.base_url, short_code);
        let qr_code = self.qr_generator.generate(&full_short_url)?;

        self.link_repository
            .create(NewLink {
                long_url,
                short_code,
                custom_code,
                full_short_url,
                qr_code: Some(qr_code),
                user_id,
            })
            .await
    }

    /// Resolves a short code to its redirect target and records the visit.
    ///
    /// Click recording is best-effort: a failed append is logged and the
    /// redirect proceeds, a visitor is never blocked on telemetry.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown code
    /// - [`AppError::Validation`] when the stored target no longer passes
    ///   redirect validation
    pub async fn resolve(&self, code: &str, metadata: ClickMetadata) -> Result<String, AppError> {
        let code = normalize_code(code);

        let link = self
            .link_repository
            .find_by_code(&code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found", json!({ "short_code": code }))
            })?;

        if !is_valid_redirect_target(&link.long_url) {
            return Err(AppError::bad_request(
                "Invalid redirect target",
                json!({ "short_code": code }),
            ));
        }

        let country = self.geo_lookup.country(&metadata.ip).await;
        let click = NewClick::from_request(
            link.id,
            metadata.referrer.as_deref(),
            metadata.user_agent.as_deref(),
            metadata.ip,
            country,
        );

        if let Err(e) = self.link_repository.append_click(click).await {
            tracing::warn!(link_id = link.id, error = %e, "failed to record click");
        }

        Ok(link.long_url)
    }

    /// Lists the user's links, newest first.
    pub async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_for_owner(user_id).await
    }

    /// Case-insensitive substring search over the user's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank query.
    pub async fn search(&self, user_id: i64, query: &str) -> Result<Vec<Link>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::bad_request("Search query is required", json!({})));
        }

        self.link_repository.search_for_owner(user_id, query).await
    }

    /// Aggregates click statistics for one of the user's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the link does not exist or belongs
    /// to someone else; the two cases are indistinguishable to the caller.
    pub async fn analytics(&self, user_id: i64, link_id: i64) -> Result<LinkAnalytics, AppError> {
        let link = self
            .link_repository
            .find_by_id_and_owner(link_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found", json!({ "link_id": link_id }))
            })?;

        let clicks = self.link_repository.clicks_for_link(link.id).await?;
        Ok(aggregate_clicks(&clicks))
    }

    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code();
            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }
}

/// Folds a click log into per-dimension counts.
///
/// Dates are bucketed by UTC calendar day. Browsers are keyed by the raw
/// user agent string, an empty one counts as "Unknown".
fn aggregate_clicks(clicks: &[Click]) -> LinkAnalytics {
    let mut analytics = LinkAnalytics {
        total_clicks: clicks.len() as u64,
        ..Default::default()
    };

    for click in clicks {
        let date = click.clicked_at.format("%Y-%m-%d").to_string();
        *analytics.clicks_by_date.entry(date).or_insert(0) += 1;

        let browser = if click.user_agent.is_empty() {
            "Unknown"
        } else {
            &click.user_agent
        };
        *analytics.browsers.entry(browser.to_string()).or_insert(0) += 1;

        *analytics
            .countries
            .entry(click.country.clone())
            .or_insert(0) += 1;
        *analytics
            .referrers
            .entry(click.referrer.clone())
            .or_insert(0) += 1;
    }

    analytics
}
