//! One-time verification code entity.

use chrono::{DateTime, Utc};

/// A persisted one-time code with a store-enforced time-to-live.
///
/// At most one set of live codes exists per user; generating a new code
/// deletes all prior codes for that user first.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for persisting a freshly generated code.
#[derive(Debug, Clone)]
pub struct NewOtp {
    pub user_id: i64,
    pub email: String,
    pub code: String,
}
