//! PostgreSQL implementations of the domain repositories.

pub mod pg_link_repository;
pub mod pg_otp_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_otp_repository::PgOtpRepository;
pub use pg_user_repository::PgUserRepository;
