//! Outbound email capability.

use crate::error::AppError;
use async_trait::async_trait;

/// Email-send primitive taking (recipient, subject, HTML body).
///
/// # Implementations
///
/// - [`crate::infrastructure::email::SmtpMailer`] - SMTP via lettre
/// - [`crate::infrastructure::email::LogMailer`] - logs instead of sending
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message. A failure is reported as
    /// [`AppError::Dependency`]; the caller decides whether already-persisted
    /// state is kept.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
