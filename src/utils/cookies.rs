//! Credential cookie helpers.
//!
//! The token pair travels as two HTTP-only, SameSite=Lax cookies; neither is
//! ever readable from scripts. The `Secure` flag follows deployment config.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::application::services::token_service::TokenPair;

pub const ACCESS_TOKEN_COOKIE: &str = "x-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "x-refresh-token";

fn build(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(max_age);
    cookie
}

/// Sets both credential cookies, with the max-age of each matching its
/// token's TTL.
pub fn set_token_cookies(
    jar: CookieJar,
    tokens: &TokenPair,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    secure: bool,
) -> CookieJar {
    jar.add(build(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        Duration::seconds(access_ttl_secs),
        secure,
    ))
    .add(build(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        Duration::seconds(refresh_ttl_secs),
        secure,
    ))
}

/// Clears both credential cookies.
pub fn clear_token_cookies(jar: CookieJar) -> CookieJar {
    let mut access = Cookie::new(ACCESS_TOKEN_COOKIE, "");
    access.set_path("/");
    access.make_removal();

    let mut refresh = Cookie::new(REFRESH_TOKEN_COOKIE, "");
    refresh.set_path("/");
    refresh.make_removal();

    jar.add(access).add(refresh)
}
