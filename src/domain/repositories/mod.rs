//! Data access trait definitions.
//!
//! Each store exposes a narrow create/update/delete contract; all shared
//! mutable state goes through these traits. PostgreSQL implementations live
//! in [`crate::infrastructure::persistence`]; test mocks are generated with
//! `mockall` under `cfg(test)`.

pub mod link_repository;
pub mod otp_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use otp_repository::OtpRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use otp_repository::MockOtpRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
