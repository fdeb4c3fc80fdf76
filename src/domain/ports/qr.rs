//! QR image generation capability.

use crate::error::AppError;

/// Image-generation primitive taking a URL and returning an encoded image
/// as a data URL string.
#[cfg_attr(test, mockall::automock)]
pub trait QrGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Dependency`] when the image cannot be produced.
    /// Link creation treats this as fatal so a link is never persisted
    /// without its QR artifact.
    fn generate(&self, url: &str) -> Result<String, AppError>;
}
