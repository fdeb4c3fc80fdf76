//! Repository trait for short link and click data access.

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short links and their append-only click log.
///
/// # Concurrency
///
/// `append_click` must be an atomic append usable safely under concurrent
/// writers to the same link; two simultaneous redirects on one link may never
/// lose each other's events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists and
    /// [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its (already normalized) short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Ownership-scoped lookup by link id. Returns `None` when the link does
    /// not exist or belongs to a different user.
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner_user_id: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Lists all links owned by a user, newest first.
    async fn list_for_owner(&self, owner_user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Case-insensitive substring search over long URL and short code,
    /// scoped to the owner, newest first.
    async fn search_for_owner(
        &self,
        owner_user_id: i64,
        query: &str,
    ) -> Result<Vec<Link>, AppError>;

    /// Appends one click event to a link's log.
    async fn append_click(&self, click: NewClick) -> Result<(), AppError>;

    /// Returns a link's click log in insertion order.
    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError>;
}
