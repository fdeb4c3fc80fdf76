//! Repository trait for the credential store.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already taken and
    /// [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Marks the user as verified and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn mark_verified(&self, id: i64) -> Result<User, AppError>;

    /// Unconditionally stores (or clears, with `None`) the user's refresh
    /// token, replacing any prior one.
    async fn set_refresh_token<'a>(&self, id: i64, token: Option<&'a str>) -> Result<(), AppError>;

    /// Atomically swaps the stored refresh token from `current` to `next`.
    ///
    /// The comparison and write are a single authoritative check-and-set
    /// against stored state at the moment of the write. Returns `false` when
    /// the stored token no longer equals `current`, which means a concurrent
    /// rotation already superseded it.
    async fn rotate_refresh_token(
        &self,
        id: i64,
        current: &str,
        next: &str,
    ) -> Result<bool, AppError>;
}
