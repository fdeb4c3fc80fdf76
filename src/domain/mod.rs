//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions (credential, OTP and
//!   link stores)
//! - [`ports`] - External collaborator traits the core calls through narrow
//!   interfaces (mail, QR image generation, geo lookup, media upload)
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; repository and port traits are implemented under
//! [`crate::infrastructure`].

pub mod entities;
pub mod ports;
pub mod repositories;
