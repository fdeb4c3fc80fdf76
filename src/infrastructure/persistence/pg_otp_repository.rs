//! PostgreSQL implementation of the one-time code store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewOtp, OtpRecord};
use crate::domain::repositories::OtpRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct OtpRow {
    id: i64,
    user_id: i64,
    email: String,
    code: String,
    created_at: DateTime<Utc>,
}

impl From<OtpRow> for OtpRecord {
    fn from(row: OtpRow) -> Self {
        OtpRecord {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            code: row.code,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL store for one-time codes with query-enforced expiry.
///
/// Rows are never updated. Liveness is a predicate on `created_at`, so a code
/// expires without any background job. Stale rows are evicted opportunistically
/// on each insert.
pub struct PgOtpRepository {
    pool: Arc<PgPool>,
    ttl_secs: i64,
}

impl PgOtpRepository {
    pub fn new(pool: Arc<PgPool>, ttl_secs: i64) -> Self {
        Self { pool, ttl_secs }
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    async fn create(&self, new_otp: NewOtp) -> Result<OtpRecord, AppError> {
        // opportunistic eviction of expired rows, any user
        sqlx::query("DELETE FROM otps WHERE created_at <= now() - make_interval(secs => $1)")
            .bind(self.ttl_secs as f64)
            .execute(self.pool.as_ref())
            .await?;

        let row = sqlx::query_as::<_, OtpRow>(
            "INSERT INTO otps (user_id, email, code)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, email, code, created_at",
        )
        .bind(new_otp.user_id)
        .bind(&new_otp.email)
        .bind(&new_otp.code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_live(&self, user_id: i64, code: &str) -> Result<Option<OtpRecord>, AppError> {
        let row = sqlx::query_as::<_, OtpRow>(
            "SELECT id, user_id, email, code, created_at
             FROM otps
             WHERE user_id = $1
               AND code = $2
               AND created_at > now() - make_interval(secs => $3)",
        )
        .bind(user_id)
        .bind(code)
        .bind(self.ttl_secs as f64)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn latest_live_for_user(&self, user_id: i64) -> Result<Option<OtpRecord>, AppError> {
        let row = sqlx::query_as::<_, OtpRow>(
            "SELECT id, user_id, email, code, created_at
             FROM otps
             WHERE user_id = $1
               AND created_at > now() - make_interval(secs => $2)
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .bind(self.ttl_secs as f64)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM otps WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
