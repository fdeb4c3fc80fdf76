//! Registration, verification, login, token refresh and logout.
//!
//! Session model: one live refresh token per user. Issuing a new pair
//! overwrites the stored refresh token, which caps concurrent sessions at one
//! and makes stolen-token reuse detectable: a refresh attempt with a
//! superseded token no longer matches the stored one and is rejected.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::otp_service::OtpService;
use crate::application::services::token_service::{
    TokenError, TokenKind, TokenPair, TokenPayload, TokenService,
};
use crate::domain::entities::{NewUser, User};
use crate::domain::ports::MediaStore;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Input data for registration.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub photo_base64: Option<String>,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    otp_service: Arc<OtpService>,
    token_service: Arc<TokenService>,
    media_store: Arc<dyn MediaStore>,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        otp_service: Arc<OtpService>,
        token_service: Arc<TokenService>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            user_repository,
            otp_service,
            token_service,
            media_store,
        }
    }

    /// Creates an unverified account and dispatches the verification code.
    ///
    /// The optional profile photo is uploaded first so the stored record
    /// already carries its public URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::Conflict`] when the email is taken
    /// - [`AppError::Dependency`] when photo upload or mail delivery fails;
    ///   on mail failure the account and its code stay persisted, a resend
    ///   recovers
    pub async fn register(&self, data: RegisterData) -> Result<User, AppError> {
        if self
            .user_repository
            .find_by_email(&data.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Email already exists",
                json!({ "email": data.email }),
            ));
        }

        let (photo_url, photo_public_id) = match &data.photo_base64 {
            Some(photo) => {
                let stored = self.media_store.upload(photo).await?;
                (Some(stored.url), Some(stored.public_id))
            }
            None => (None, None),
        };

        let password_hash = hash_password(&data.password)?;

        let user = self
            .user_repository
            .create(NewUser {
                name: data.name,
                email: data.email,
                phone_number: data.phone_number,
                password_hash,
                photo_url,
                photo_public_id,
            })
            .await?;

        self.otp_service
            .generate_and_send(user.id, &user.email)
            .await?;

        Ok(user)
    }

    /// Confirms the account with a one-time code and opens the first session.
    ///
    /// On success `is_verified` flips to true (exactly once), a token pair is
    /// issued and the refresh token is persisted, overwriting any prior one.
    pub async fn verify_otp(&self, user_id: i64, code: &str) -> Result<(User, TokenPair), AppError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "user_id": user_id })))?;

        if user.is_verified {
            return Err(AppError::bad_request(
                "Email already verified",
                json!({ "user_id": user_id }),
            ));
        }

        self.otp_service.verify(user_id, code).await?;

        let user = self.user_repository.mark_verified(user_id).await?;

        let tokens = self.issue_session(&user).await?;
        Ok((user, tokens))
    }

    /// Re-dispatches a verification code.
    ///
    /// An unknown email returns success silently so the endpoint cannot be
    /// used to enumerate accounts.
    pub async fn resend_otp(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repository.find_by_email(email).await? else {
            return Ok(());
        };

        if user.is_verified {
            return Err(AppError::bad_request(
                "Email already verified",
                json!({ "email": email }),
            ));
        }

        self.otp_service.resend(user.id, &user.email).await
    }

    /// Opens a session for a verified account.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let invalid = || AppError::bad_request("Invalid credentials", json!({}));

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !user.is_verified {
            return Err(AppError::bad_request(
                "Email not verified",
                json!({ "email": email }),
            ));
        }

        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        let tokens = self.issue_session(&user).await?;
        Ok((user, tokens))
    }

    /// Rotates the session's token pair.
    ///
    /// Returns `Ok(None)` when the access token is still valid: the session
    /// is live and nothing rotates. Otherwise the refresh token is verified,
    /// matched against the stored one (reuse detection) and atomically
    /// swapped for a new pair. If a concurrent refresh wins the swap, this
    /// call fails as reuse: at most one rotation succeeds per issued token.
    ///
    /// # Errors
    ///
    /// All failures are [`AppError::Unauthorized`]: missing refresh token,
    /// non-expired access verification failure, bad refresh signature, or a
    /// presented token that no longer matches the stored one.
    pub async fn refresh(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Option<TokenPair>, AppError> {
        let refresh_token = refresh_token
            .ok_or_else(|| AppError::unauthorized("Token missing", json!({})))?;

        match access_token
            .ok_or(TokenError::Invalid)
            .and_then(|t| self.token_service.verify(t, TokenKind::Access))
        {
            Ok(_) => return Ok(None),
            Err(TokenError::Expired) => {}
            Err(TokenError::Invalid) => {
                return Err(AppError::unauthorized("Token invalid", json!({})));
            }
        }

        let payload = self
            .token_service
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::unauthorized("Token invalid", json!({})))?;

        let reused = || {
            AppError::unauthorized(
                "Token invalid or reused",
                json!({ "user_id": payload.user_id }),
            )
        };

        let user = self
            .user_repository
            .find_by_id(payload.user_id)
            .await?
            .ok_or_else(reused)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            return Err(reused());
        }

        let tokens = self.token_service.issue_pair(&TokenPayload {
            user_id: user.id,
            email: user.email.clone(),
        })?;

        let rotated = self
            .user_repository
            .rotate_refresh_token(user.id, refresh_token, &tokens.refresh_token)
            .await?;

        if !rotated {
            return Err(reused());
        }

        Ok(Some(tokens))
    }

    /// Closes the session. Best-effort: an unknown user is not an error.
    pub async fn logout(&self, user_id: i64) -> Result<(), AppError> {
        if self.user_repository.find_by_id(user_id).await?.is_some() {
            self.user_repository.set_refresh_token(user_id, None).await?;
        }
        Ok(())
    }

    /// Returns the account for profile display.
    pub async fn get_me(&self, user_id: i64) -> Result<User, AppError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "user_id": user_id })))
    }

    async fn issue_session(&self, user: &User) -> Result<TokenPair, AppError> {
        let tokens = self.token_service.issue_pair(&TokenPayload {
            user_id: user.id,
            email: user.email.clone(),
        })?;

        self.user_repository
            .set_refresh_token(user.id, Some(&tokens.refresh_token))
            .await?;

        Ok(tokens)
    }
}
