//! Shared test fixtures: in-memory stores behind the repository traits and a
//! fully wired test server. No database or SMTP relay needed.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::{TestServer, TestServerConfig};
use chrono::{Duration, Utc};
use serde_json::json;

use quicklink::application::services::{AuthService, LinkService, OtpService, TokenService};
use quicklink::domain::entities::{
    Click, Link, NewClick, NewLink, NewOtp, NewUser, OtpRecord, User,
};
use quicklink::domain::ports::{GeoLookup, Mailer, MediaStore, StoredMedia};
use quicklink::domain::repositories::{LinkRepository, OtpRepository, UserRepository};
use quicklink::error::AppError;
use quicklink::infrastructure::qr::SvgQrGenerator;
use quicklink::{routes, AppState};

pub const BASE_URL: &str = "http://sho.rt";
pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Direct read of a stored user, for assertions on persisted state.
    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Email already exists", json!({})));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: new_user.name,
            email: new_user.email,
            phone_number: new_user.phone_number,
            password_hash: new_user.password_hash,
            photo_url: new_user.photo_url,
            photo_public_id: new_user.photo_public_id,
            is_verified: false,
            refresh_token: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn mark_verified(&self, id: i64) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;
        user.is_verified = true;
        Ok(user.clone())
    }

    async fn set_refresh_token<'a>(&self, id: i64, token: Option<&'a str>) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.refresh_token = token.map(str::to_string);
        }
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        id: i64,
        current: &str,
        next: &str,
    ) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) if user.refresh_token.as_deref() == Some(current) => {
                user.refresh_token = Some(next.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub struct InMemoryOtpRepository {
    rows: Mutex<Vec<OtpRecord>>,
    next_id: AtomicI64,
    ttl: Duration,
}

impl InMemoryOtpRepository {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Backdates every stored code, simulating the passage of time.
    pub fn age_all(&self, secs: i64) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            row.created_at -= Duration::seconds(secs);
        }
    }

    fn is_live(&self, record: &OtpRecord) -> bool {
        Utc::now() - record.created_at < self.ttl
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn create(&self, new_otp: NewOtp) -> Result<OtpRecord, AppError> {
        let record = OtpRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: new_otp.user_id,
            email: new_otp.email,
            code: new_otp.code,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_live(&self, user_id: i64, code: &str) -> Result<Option<OtpRecord>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.code == code && self.is_live(r))
            .cloned())
    }

    async fn latest_live_for_user(&self, user_id: i64) -> Result<Option<OtpRecord>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && self.is_live(r))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    clicks: Mutex<Vec<Click>>,
    next_link_id: AtomicI64,
    next_click_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn click_count(&self, link_id: i64) -> usize {
        self.clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .count()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.short_code == new_link.short_code) {
            return Err(AppError::conflict(
                "This custom URL already exists",
                json!({}),
            ));
        }

        let link = Link {
            id: self.next_link_id.fetch_add(1, Ordering::SeqCst) + 1,
            long_url: new_link.long_url,
            short_code: new_link.short_code,
            custom_code: new_link.custom_code,
            full_short_url: new_link.full_short_url,
            qr_code: new_link.qr_code,
            user_id: new_link.user_id,
            created_at: Utc::now(),
        };
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == code)
            .cloned())
    }

    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner_user_id: i64,
    ) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id && l.user_id == owner_user_id)
            .cloned())
    }

    async fn list_for_owner(&self, owner_user_id: i64) -> Result<Vec<Link>, AppError> {
        let mut out: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == owner_user_id)
            .cloned()
            .collect();
        out.sort_by_key(|l| std::cmp::Reverse(l.id));
        Ok(out)
    }

    async fn search_for_owner(
        &self,
        owner_user_id: i64,
        query: &str,
    ) -> Result<Vec<Link>, AppError> {
        let needle = query.to_lowercase();
        let mut out: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| {
                l.user_id == owner_user_id
                    && (l.long_url.to_lowercase().contains(&needle)
                        || l.short_code.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        out.sort_by_key(|l| std::cmp::Reverse(l.id));
        Ok(out)
    }

    async fn append_click(&self, click: NewClick) -> Result<(), AppError> {
        let mut clicks = self.clicks.lock().unwrap();
        clicks.push(Click {
            id: self.next_click_id.fetch_add(1, Ordering::SeqCst) + 1,
            link_id: click.link_id,
            clicked_at: Utc::now(),
            referrer: click.referrer,
            user_agent: click.user_agent,
            ip: click.ip,
            country: click.country,
        });
        Ok(())
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        Ok(self
            .clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect())
    }
}

/// Mailer that records every message instead of sending.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    /// Pulls the 6-digit code out of the most recent message to `email`.
    pub fn last_otp_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let (_, _, body) = sent.iter().rev().find(|(to, _, _)| to == email)?;

        let start = body.find("<h1>")? + 4;
        let end = body[start..].find("</h1>")? + start;
        Some(body[start..end].to_string())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((
            to.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

pub struct NoGeo;

#[async_trait]
impl GeoLookup for NoGeo {
    async fn country(&self, _ip: &str) -> Option<String> {
        None
    }
}

/// Media store that pretends every upload succeeded.
pub struct FakeMediaStore;

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, _base64_data: &str) -> Result<StoredMedia, AppError> {
        Ok(StoredMedia {
            url: "/static/uploads/test.png".to_string(),
            public_id: "test.png".to_string(),
        })
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub users: Arc<InMemoryUserRepository>,
    pub otps: Arc<InMemoryOtpRepository>,
    pub links: Arc<InMemoryLinkRepository>,
    pub mailer: Arc<RecordingMailer>,
}

/// Builds the full router against in-memory stores. The server keeps cookies
/// between requests, so a login carries over to later calls like a browser.
pub fn spawn_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::default());
    let otps = Arc::new(InMemoryOtpRepository::new(600));
    let links = Arc::new(InMemoryLinkRepository::default());
    let mailer = Arc::new(RecordingMailer::default());

    let token_service = Arc::new(TokenService::new(
        ACCESS_SECRET.to_string(),
        REFRESH_SECRET.to_string(),
        900,
        604_800,
    ));
    let otp_service = Arc::new(OtpService::new(otps.clone(), mailer.clone(), 0));
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        otp_service,
        token_service.clone(),
        Arc::new(FakeMediaStore),
    ));
    let link_service = Arc::new(LinkService::new(
        links.clone(),
        Arc::new(SvgQrGenerator),
        Arc::new(NoGeo),
        BASE_URL.to_string(),
    ));

    let state = AppState::new(auth_service, link_service, token_service, false);

    let config = TestServerConfig {
        save_cookies: true,
        ..Default::default()
    };
    let server =
        TestServer::new_with_config(routes::router(state, false), config).unwrap();

    TestApp {
        server,
        users,
        otps,
        links,
        mailer,
    }
}

impl TestApp {
    /// Registers and verifies an account, leaving the session cookies in the
    /// server's jar. Returns the user id.
    pub async fn signed_up_user(&self, email: &str) -> i64 {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "name": "Ana",
                "email": email,
                "phoneNumber": "1234567890",
                "password": "secret1",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let user_id = response.json::<serde_json::Value>()["data"]["userId"]
            .as_i64()
            .unwrap();
        let otp = self.mailer.last_otp_for(email).unwrap();

        let response = self
            .server
            .post("/auth/verify-otp")
            .json(&json!({ "userId": user_id, "otp": otp }))
            .await;
        response.assert_status_ok();

        user_id
    }
}
