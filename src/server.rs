//! HTTP server initialization and runtime setup.
//!
//! Wires the connection pool, repositories, services and router together and
//! runs the Axum server.

use crate::application::services::{AuthService, LinkService, OtpService, TokenService};
use crate::config::Config;
use crate::domain::ports::Mailer;
use crate::infrastructure::email::{LogMailer, SmtpMailer};
use crate::infrastructure::geoip::NullGeoLookup;
use crate::infrastructure::media::FsMediaStore;
use crate::infrastructure::persistence::{PgLinkRepository, PgOtpRepository, PgUserRepository};
use crate::infrastructure::qr::SvgQrGenerator;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::extract::Request;
use axum::ServiceExt;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - SMTP mailer (or the logging fallback)
/// - Repositories and services
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migration run, or server
/// bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let pool = Arc::new(pool);
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let otp_repository = Arc::new(PgOtpRepository::new(pool.clone(), config.otp_ttl_secs));
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!("Email delivery enabled (SMTP via {})", smtp.host);
            Arc::new(SmtpMailer::new(
                &smtp.host,
                smtp.port,
                smtp.username.clone(),
                smtp.password.clone(),
                &smtp.from,
            )?)
        }
        None => {
            tracing::warn!("SMTP not configured, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let token_service = Arc::new(TokenService::new(
        config.access_token_secret.clone(),
        config.refresh_token_secret.clone(),
        config.access_token_ttl_secs,
        config.refresh_token_ttl_secs,
    ));
    let otp_service = Arc::new(OtpService::new(
        otp_repository,
        mailer,
        config.otp_resend_cooldown_secs,
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        otp_service,
        token_service.clone(),
        Arc::new(FsMediaStore::new("static/uploads", "/static/uploads")),
    ));
    let link_service = Arc::new(LinkService::new(
        link_repository,
        Arc::new(SvgQrGenerator),
        Arc::new(NullGeoLookup),
        config.base_url.clone(),
    ));

    let state = AppState::new(
        auth_service,
        link_service,
        token_service,
        config.cookie_secure,
    );

    let app = app_router(state, config.rate_limit_enabled);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
