//! One-time code generation, delivery and verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::json;

use crate::domain::entities::NewOtp;
use crate::domain::ports::Mailer;
use crate::domain::repositories::OtpRepository;
use crate::error::AppError;

/// Generates a uniformly random 6-digit numeric code.
pub fn generate_otp() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// Service for issuing and verifying one-time verification codes.
///
/// Codes are single-use and store-expired: generating a new code first
/// deletes every prior code for the user, and lookups only see records
/// younger than the store's time-to-live.
pub struct OtpService {
    otp_repository: Arc<dyn OtpRepository>,
    mailer: Arc<dyn Mailer>,
    resend_cooldown: Duration,
}

impl OtpService {
    pub fn new(
        otp_repository: Arc<dyn OtpRepository>,
        mailer: Arc<dyn Mailer>,
        resend_cooldown_secs: i64,
    ) -> Self {
        Self {
            otp_repository,
            mailer,
            resend_cooldown: Duration::seconds(resend_cooldown_secs),
        }
    }

    /// Generates a fresh code for the user, persists it and dispatches it by
    /// email.
    ///
    /// The previous codes are deleted first, so at most one live set exists
    /// per user. If delivery fails the stored code is kept: the caller may
    /// trigger a resend, which repeats the deletion step anyway.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] when the newest live code is younger than
    ///   the resend cooldown
    /// - [`AppError::Dependency`] when the mail capability errors
    pub async fn generate_and_send(&self, user_id: i64, email: &str) -> Result<(), AppError> {
        if let Some(latest) = self.otp_repository.latest_live_for_user(user_id).await? {
            if Utc::now() - latest.created_at < self.resend_cooldown {
                return Err(AppError::bad_request(
                    "Please wait before requesting a new OTP",
                    json!({ "cooldown_seconds": self.resend_cooldown.num_seconds() }),
                ));
            }
        }

        self.otp_repository.delete_for_user(user_id).await?;

        let code = generate_otp();
        tracing::debug!(user_id, "generated verification code");

        self.otp_repository
            .create(NewOtp {
                user_id,
                email: email.to_string(),
                code: code.clone(),
            })
            .await?;

        self.mailer
            .send(
                email,
                "Email Verification OTP",
                &format!(
                    "<div style=\"font-family: Arial, sans-serif;\">\
                     <h2>Email Verification</h2>\
                     <p>Your OTP for email verification is:</p>\
                     <h1>{code}</h1>\
                     <p>If you didn't request this verification, please ignore this email.</p>\
                     </div>"
                ),
            )
            .await
    }

    /// Verifies a code for the user. On success all of the user's codes are
    /// deleted (one-shot use).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when no live record matches exactly
    /// (user, code); expiry is indistinguishable from a wrong code.
    pub async fn verify(&self, user_id: i64, code: &str) -> Result<(), AppError> {
        let record = self.otp_repository.find_live(user_id, code).await?;

        if record.is_none() {
            return Err(AppError::bad_request(
                "Invalid or expired OTP",
                json!({ "user_id": user_id }),
            ));
        }

        self.otp_repository.delete_for_user(user_id).await?;
        Ok(())
    }

    /// Identical to [`Self::generate_and_send`]; the distinction exists only
    /// for callers' intent.
    pub async fn resend(&self, user_id: i64, email: &str) -> Result<(), AppError> {
        self.generate_and_send(user_id, email).await
    }
}
