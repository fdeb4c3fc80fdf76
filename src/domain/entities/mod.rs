//! Core business entities.

pub mod click;
pub mod link;
pub mod otp;
pub mod user;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
pub use otp::{NewOtp, OtpRecord};
pub use user::{NewUser, User};
