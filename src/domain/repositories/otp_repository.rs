//! Repository trait for one-time code storage.

use crate::domain::entities::{NewOtp, OtpRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for OTP records.
///
/// Expiry is enforced by the store: `find_live` and `latest_live_for_user`
/// only consider records younger than the configured time-to-live, and stale
/// rows are evicted opportunistically. Callers never compare timestamps
/// themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    async fn create(&self, new_otp: NewOtp) -> Result<OtpRecord, AppError>;

    /// Finds a live record matching exactly (user, code).
    async fn find_live(&self, user_id: i64, code: &str) -> Result<Option<OtpRecord>, AppError>;

    /// Returns the newest live record for the user, if any. Used for the
    /// server-side resend cooldown.
    async fn latest_live_for_user(&self, user_id: i64) -> Result<Option<OtpRecord>, AppError>;

    /// Deletes all codes for the user, returning how many were removed.
    async fn delete_for_user(&self, user_id: i64) -> Result<u64, AppError>;
}
