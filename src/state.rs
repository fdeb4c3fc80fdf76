//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub link_service: Arc<LinkService>,
    pub token_service: Arc<TokenService>,
    /// Whether credential cookies carry the `Secure` flag.
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        link_service: Arc<LinkService>,
        token_service: Arc<TokenService>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            auth_service,
            link_service,
            token_service,
            cookie_secure,
        }
    }
}
