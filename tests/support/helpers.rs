// tests/support/helpers.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode, header};
use pastry_market::application::{
    commands::{
        pastries::CreatePastryCommand,
        users::{LoginResult, LoginUserCommand, RegisterUserCommand},
    },
    dto::{AuthenticatedUser, OwnerPastryDto, UserDto},
    services::{ApplicationServices, Ports, Repositories},
};
use pastry_market::infrastructure::security::token::BiscuitTokenManager;
use pastry_market::presentation::http::{routes::build_router, state::HttpState};
use serde_json::Value;

use super::memory::InMemoryStore;
use super::mocks::{DummyPasswordHasher, MemoryMediaStorage, StubGeolocation, TestClock};

pub const PASSWORD: &str = "correct horse";
pub const ACCESS_TTL: Duration = Duration::from_secs(900);
pub const REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Services wired to in-memory adapters, with handles to inspect them.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<TestClock>,
    pub geolocation: Arc<StubGeolocation>,
    pub storage: Arc<MemoryMediaStorage>,
}

/// A registered and logged-in user.
pub struct Session {
    pub user: UserDto,
    pub auth: AuthenticatedUser,
    pub login: LoginResult,
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.login.token.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.login.token.refresh_token
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(TestClock::new());
        let geolocation = Arc::new(StubGeolocation::default());
        let storage = Arc::new(MemoryMediaStorage::default());

        let key_hex = biscuit_auth::KeyPair::new().private().to_bytes_hex();
        let token_manager = BiscuitTokenManager::new(&key_hex, ACCESS_TTL, REFRESH_TTL, clock.clone())
            .expect("token manager");

        let services = ApplicationServices::new(
            Repositories {
                users: store.clone(),
                refresh_tokens: store.clone(),
                pastry_write: store.clone(),
                pastry_read: store.clone(),
                likes: store.clone(),
                follows: store.clone(),
            },
            Ports {
                password_hasher: Arc::new(DummyPasswordHasher),
                token_manager: Arc::new(token_manager),
                clock: clock.clone(),
                geolocation: geolocation.clone(),
                media_storage: storage.clone(),
            },
        );

        Self {
            services: Arc::new(services),
            store,
            clock,
            geolocation,
            storage,
        }
    }

    pub fn router(&self) -> axum::Router {
        build_router(HttpState::new(self.services.clone()), &["*".to_string()])
    }

    pub async fn register(&self, username: &str) -> UserDto {
        self.services
            .user_commands
            .register(RegisterUserCommand {
                email: format!("{username}@example.com"),
                username: username.to_string(),
                password: PASSWORD.to_string(),
                password_confirmation: PASSWORD.to_string(),
                phone: None,
            })
            .await
            .expect("register")
    }

    pub async fn sign_in(&self, username: &str) -> Session {
        let user = self.register(username).await;
        let login = self
            .services
            .user_commands
            .login(LoginUserCommand {
                email: user.email.clone(),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("login");
        let auth = self
            .services
            .authenticate(&login.token.access_token)
            .await
            .expect("authenticate");
        Session { user, auth, login }
    }

    pub async fn create_pastry(
        &self,
        owner: &AuthenticatedUser,
        command: CreatePastryCommand,
    ) -> OwnerPastryDto {
        self.services
            .pastry_commands
            .create(owner, command)
            .await
            .expect("create pastry")
    }
}

static NEXT_CLIENT: AtomicUsize = AtomicUsize::new(1);

/// Distinct client address per request so the shared rate limiter never
/// throttles unrelated tests.
pub fn client_ip() -> String {
    let n = NEXT_CLIENT.fetch_add(1, Ordering::SeqCst);
    format!("10.{}.{}.{}", (n >> 16) & 0xff, (n >> 8) & 0xff, n & 0xff)
}

pub fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", client_ip());
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", client_ip());
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Assert that a response is an ErrorResponse JSON with the expected status and error string.
pub async fn assert_error_response(
    resp: axum::response::Response,
    expected_status: StatusCode,
    expected_error: &str,
) {
    assert_eq!(resp.status(), expected_status);
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let ct = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json: Value = serde_json::from_slice(&body_bytes).expect("expected valid json body");
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let msg_field = json.get("message").and_then(|v| v.as_str()).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {err_field}");
    assert!(!msg_field.is_empty(), "expected non-empty message field");
}
