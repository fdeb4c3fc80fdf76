//! Mailer implementations.
//!
//! [`SmtpMailer`] delivers through a real SMTP relay via lettre.
//! [`LogMailer`] logs the message instead, for local development where no
//! relay is configured.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;

use crate::domain::ports::Mailer;
use crate::error::AppError;

/// SMTP-backed mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds a mailer against an SMTP relay with STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Dependency`] for an unresolvable relay host or an
    /// unparseable sender address.
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        from: &str,
    ) -> Result<Self, AppError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| {
                AppError::dependency(
                    "Failed to configure SMTP transport",
                    json!({ "host": host, "source": e.to_string() }),
                )
            })?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        let from = from.parse::<Mailbox>().map_err(|e| {
            AppError::dependency(
                "Invalid sender address",
                json!({ "from": from, "source": e.to_string() }),
            )
        })?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let to = to.parse::<Mailbox>().map_err(|e| {
            AppError::bad_request(
                "Invalid recipient address",
                json!({ "to": to, "source": e.to_string() }),
            )
        })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| {
                AppError::dependency(
                    "Failed to build email message",
                    json!({ "source": e.to_string() }),
                )
            })?;

        self.transport.send(message).await.map_err(|e| {
            AppError::dependency(
                "Failed to send email",
                json!({ "source": e.to_string() }),
            )
        })?;

        Ok(())
    }
}

/// Development mailer that logs instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        tracing::info!(to, subject, body_len = html_body.len(), "email (not sent, SMTP disabled)");
        Ok(())
    }
}
