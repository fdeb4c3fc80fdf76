//! Request handlers.

pub mod auth;
pub mod health;
pub mod links;
pub mod redirect;

pub use auth::{
    login_handler, logout_handler, me_handler, refresh_token_handler, register_handler,
    resend_otp_handler, verify_otp_handler,
};
pub use health::health_handler;
pub use links::{analytics_handler, create_link_handler, list_links_handler, search_links_handler};
pub use redirect::redirect_handler;
