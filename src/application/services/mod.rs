//! Core services.
//!
//! - [`token_service`] - stateless signed-token issue/verify with two
//!   independent secret domains
//! - [`otp_service`] - one-time code generation, delivery and verification
//! - [`auth_service`] - registration, verification, login, refresh rotation
//!   with reuse detection, logout
//! - [`link_service`] - short link creation, public redirect resolution with
//!   click telemetry, listing, search and analytics

pub mod auth_service;
pub mod link_service;
pub mod otp_service;
pub mod token_service;

pub use auth_service::AuthService;
pub use link_service::LinkService;
pub use otp_service::OtpService;
pub use token_service::TokenService;
