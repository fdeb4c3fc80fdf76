//! Click event entities for redirect telemetry.

use chrono::{DateTime, Utc};

/// One recorded visit to a short link's redirect endpoint.
///
/// Immutable once appended; insertion order is preserved in storage.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: String,
    pub ip: String,
    pub country: String,
}

/// Input data for appending a click to a link's log.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub referrer: String,
    pub user_agent: String,
    pub ip: String,
    pub country: String,
}

impl NewClick {
    /// Builds a click from request metadata, applying the documented
    /// defaults: empty referrer becomes "Direct", unknown origin "Unknown".
    pub fn from_request(
        link_id: i64,
        referrer: Option<&str>,
        user_agent: Option<&str>,
        ip: String,
        country: Option<String>,
    ) -> Self {
        Self {
            link_id,
            referrer: match referrer {
                Some(r) if !r.is_empty() => r.to_string(),
                _ => "Direct".to_string(),
            },
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip,
            country: country.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}
