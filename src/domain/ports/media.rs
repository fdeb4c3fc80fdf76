//! Media upload capability for profile photos.

use crate::error::AppError;
use async_trait::async_trait;

/// A stored media object: its public URL plus the identifier needed to
/// reference it later.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

/// Media-upload primitive taking base64 image data and returning a public
/// URL and identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for undecodable payloads and
    /// [`AppError::Dependency`] for storage failures.
    async fn upload(&self, base64_data: &str) -> Result<StoredMedia, AppError>;
}
