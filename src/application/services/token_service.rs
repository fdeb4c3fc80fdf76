//! Stateless signed-token service.
//!
//! Issues and verifies the two token kinds of the session model: short-lived
//! access tokens and long-lived refresh tokens. Each kind is signed with its
//! own secret, so a refresh token can never be replayed as an access token.
//! No persistence; purely a function of secret material and payload.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;

/// Which secret domain a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Verification failure. `Expired` is distinguished from every other failure
/// because it changes control flow in the refresh path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// The identity carried inside every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: i64,
    pub email: String,
}

/// A freshly issued access + refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    /// Random per-issue id. Timestamps alone have second granularity, so
    /// without it two tokens issued in the same second would be identical
    /// and rotation could replace a refresh token with an equal one.
    jti: String,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }

    fn ttl(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        }
    }

    /// Issues a signed token of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`]; signing only fails on malformed key
    /// material.
    pub fn issue(&self, payload: &TokenPayload, kind: TokenKind) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: payload.user_id.to_string(),
            email: payload.email.clone(),
            jti: format!("{:032x}", rand::random::<u128>()),
            iat: now,
            exp: now + self.ttl(kind),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind).as_bytes()),
        )
        .map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "source": e.to_string() }))
        })
    }

    /// Issues a fresh access + refresh pair for one identity.
    pub fn issue_pair(&self, payload: &TokenPayload) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue(payload, TokenKind::Access)?,
            refresh_token: self.issue(payload, TokenKind::Refresh)?,
        })
    }

    /// Verifies a token against the secret of the given kind and returns its
    /// payload.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(kind).as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Invalid)?;

        Ok(TokenPayload {
            user_id,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            "access-secret".to_string(),
            "refresh-secret".to_string(),
            900,
            604_800,
        )
    }

    fn payload() -> TokenPayload {
        TokenPayload {
            user_id: 42,
            email: "ana@x.com".to_string(),
        }
    }

    #[test]
    fn test_roundtrip_access_token() {
        let svc = service();
        let token = svc.issue(&payload(), TokenKind::Access).unwrap();
        let decoded = svc.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(decoded, payload());
    }

    #[test]
    fn test_kinds_use_independent_secrets() {
        let svc = service();
        let refresh = svc.issue(&payload(), TokenKind::Refresh).unwrap();

        // A refresh token never verifies as an access token.
        assert_eq!(
            svc.verify(&refresh, TokenKind::Access),
            Err(TokenError::Invalid)
        );
        assert!(svc.verify(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_expired_is_distinguished() {
        let svc = TokenService::new(
            "access-secret".to_string(),
            "refresh-secret".to_string(),
            -10,
            -10,
        );
        let token = svc.issue(&payload(), TokenKind::Access).unwrap();
        assert_eq!(
            svc.verify(&token, TokenKind::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let svc = service();
        assert_eq!(
            svc.verify("not-a-token", TokenKind::Access),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_pair_tokens_differ() {
        let svc = service();
        let pair = svc.issue_pair(&payload()).unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_repeated_issue_never_repeats_a_token() {
        // Back-to-back issues land on the same second-granularity iat, so
        // only the per-issue id keeps them distinct. Rotation depends on the
        // replacement refresh token differing from the one it replaces.
        let svc = service();
        let a = svc.issue(&payload(), TokenKind::Refresh).unwrap();
        let b = svc.issue(&payload(), TokenKind::Refresh).unwrap();
        assert_ne!(a, b);
    }
}
