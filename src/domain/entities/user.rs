//! User account entity.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// `is_verified` transitions false to true exactly once, via OTP confirmation.
/// `refresh_token` holds at most one live refresh token at a time; issuing a
/// new one invalidates the previous (single active session per account).
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub photo_url: Option<String>,
    pub photo_public_id: Option<String>,
    pub is_verified: bool,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a user at registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub photo_url: Option<String>,
    pub photo_public_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_starts_unverified() {
        let user = User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            phone_number: "1234567890".to_string(),
            password_hash: "hash".to_string(),
            photo_url: None,
            photo_public_id: None,
            is_verified: false,
            refresh_token: None,
            created_at: Utc::now(),
        };

        assert!(!user.is_verified);
        assert!(user.refresh_token.is_none());
    }
}
