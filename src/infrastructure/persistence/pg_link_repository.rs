//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, long_url, short_code, custom_code, full_short_url, qr_code, user_id, created_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    long_url: String,
    short_code: String,
    custom_code: bool,
    full_short_url: String,
    qr_code: Option<String>,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            long_url: row.long_url,
            short_code: row.short_code,
            custom_code: row.custom_code,
            full_short_url: row.full_short_url,
            qr_code: row.qr_code,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    referrer: String,
    user_agent: String,
    ip: String,
    country: String,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click {
            id: row.id,
            link_id: row.link_id,
            clicked_at: row.clicked_at,
            referrer: row.referrer,
            user_agent: row.user_agent,
            ip: row.ip,
            country: row.country,
        }
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// PostgreSQL repository for short links and their click log.
///
/// A click is one INSERT into an append-only table, which is the atomic
/// append the trait contract requires.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO links (long_url, short_code, custom_code, full_short_url, qr_code, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.long_url)
        .bind(&new_link.short_code)
        .bind(new_link.custom_code)
        .bind(&new_link.full_short_url)
        .bind(&new_link.qr_code)
        .bind(new_link.user_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::conflict(
                "This custom URL already exists",
                json!({ "short_code": new_link.short_code }),
            ),
            _ => e.into(),
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner_user_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner_user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_for_owner(&self, owner_user_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_for_owner(
        &self,
        owner_user_id: i64,
        query: &str,
    ) -> Result<Vec<Link>, AppError> {
        let pattern = format!("%{}%", escape_like(query));

        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links
             WHERE user_id = $1 AND (long_url ILIKE $2 OR short_code ILIKE $2)
             ORDER BY created_at DESC"
        ))
        .bind(owner_user_id)
        .bind(&pattern)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn append_click(&self, click: NewClick) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO link_clicks (link_id, referrer, user_agent, ip, country)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(click.link_id)
        .bind(&click.referrer)
        .bind(&click.user_agent)
        .bind(&click.ip)
        .bind(&click.country)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            "SELECT id, link_id, clicked_at, referrer, user_agent, ip, country
             FROM link_clicks
             WHERE link_id = $1
             ORDER BY id",
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
