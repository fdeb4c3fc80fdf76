//! External collaborator interfaces consumed by the core.
//!
//! These are the narrow seams behind which mail delivery, QR image
//! generation, IP-to-country lookup and media upload live. The core performs
//! a single attempt per call and classifies failures as
//! [`crate::error::AppError::Dependency`]; it never retries on its own.

pub mod geo;
pub mod mailer;
pub mod media;
pub mod qr;

pub use geo::GeoLookup;
pub use mailer::Mailer;
pub use media::{MediaStore, StoredMedia};
pub use qr::QrGenerator;

#[cfg(test)]
pub use geo::MockGeoLookup;
#[cfg(test)]
pub use mailer::MockMailer;
#[cfg(test)]
pub use media::MockMediaStore;
#[cfg(test)]
pub use qr::MockQrGenerator;
