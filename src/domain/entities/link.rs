//! Short link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by the user who created it.
///
/// `short_code` is globally unique. `custom_code` records whether the code was
/// user-chosen rather than generated. Click events live in a separate
/// append-only log keyed by `id`.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub long_url: String,
    pub short_code: String,
    pub custom_code: bool,
    pub full_short_url: String,
    pub qr_code: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub long_url: String,
    pub short_code: String,
    pub custom_code: bool,
    pub full_short_url: String,
    pub qr_code: Option<String>,
    pub user_id: i64,
}
