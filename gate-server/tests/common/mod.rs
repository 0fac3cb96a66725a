//! Shared fixtures for the gateway integration tests
//!
//! Seeded data:
//!
//! | user | password | role | capability |
//! |------|----------|------|------------|
//! | admin | admin-pass | admin | MAX |
//! | alice | alice-pass | r-ops | 0b0111 |
//! | bob | bob-pass | r-weak | 0b0010 |

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{Duration, Utc};
use gate_server::auth::password::hash_password;
use gate_server::services::DelegatedConfig;
use gate_server::store::StoreResult;
use gate_server::{Config, MemoryStore, ServerState, Store, StoreError, build_app};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{Capability, DelegationRule, GlobalRole, License, Role, User};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret";

pub fn license_content(valid_for: Duration) -> String {
    serde_json::json!({
        "product": "cluster-gate",
        "corporation": "Acme",
        "expires_at": Utc::now() + valid_for,
    })
    .to_string()
}

pub fn valid_license() -> License {
    License::new(license_content(Duration::days(365)))
}

pub fn roles() -> Vec<Role> {
    vec![
        Role::new("admin", "admin", Capability::MAX),
        Role::new("r-ops", "ops", Capability::from_bits(0b0111)),
        Role::new("r-weak", "weak", Capability::from_bits(0b0010)),
    ]
}

pub fn user(name: &str, password: &str, role_id: &str) -> User {
    let mut user = User::new(name);
    user.password = hash_password(password).unwrap();
    user.roles = roles().into_iter().filter(|r| r.id == role_id).collect();
    user
}

pub fn users() -> Vec<User> {
    vec![
        user("admin", "admin-pass", "admin"),
        user("alice", "alice-pass", "r-ops"),
        user("bob", "bob-pass", "r-weak"),
    ]
}

/// Seeded store with a valid license
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::with_data(roles(), users()));
    store.save_license(valid_license()).await.unwrap();
    store
}

pub fn config() -> Config {
    Config::with_secret(SECRET)
}

/// Config with the delegated strategy pointed at `base_url`
pub fn delegated_config(base_url: &str) -> Config {
    let mut config = config();
    config.delegated = Some(DelegatedConfig {
        base_url: base_url.to_string(),
        token_url: format!("{base_url}/oauth/token"),
        client_id: Some("cluster-gate".into()),
        timeout_ms: 2000,
    });
    config
}

pub fn state(config: Config, store: Arc<dyn Store>) -> ServerState {
    ServerState::new(config, store).unwrap()
}

pub fn app(state: &ServerState) -> Router {
    build_app(state).with_state(state.clone())
}

/// Signed session token for `username` (no roles embedded)
pub fn token_for(state: &ServerState, username: &str) -> String {
    state.codec.issue(&User::new(username)).unwrap().0
}

pub fn request(method: Method, uri: &str) -> http::request::Builder {
    Request::builder().method(method).uri(uri)
}

pub fn bearer(method: Method, uri: &str, token: &str) -> Request<Body> {
    request(method, uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = request(method, uri).header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Send one request through the app; the body is parsed as JSON when possible
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

// =============================================================================
// Failing store
// =============================================================================

/// Store whose user/role reads fail; the license can still be served
#[derive(Default)]
pub struct FailingStore {
    pub license_fails: bool,
}

#[async_trait]
impl Store for FailingStore {
    async fn get_user(&self, _username: &str) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get_role(&self, _id: &str) -> StoreResult<Option<Role>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn create_or_update_user(&self, _user: User) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn create_or_update_role(&self, _role: Role) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete_user(&self, _username: &str) -> StoreResult<bool> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete_role(&self, _id: &str) -> StoreResult<bool> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get_license(&self) -> StoreResult<Option<License>> {
        if self.license_fails {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(Some(valid_license()))
    }

    async fn save_license(&self, _license: License) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

// =============================================================================
// Mock identity platform
// =============================================================================

/// Bearer token the mock platform accepts for alice
pub const ALICE_UPSTREAM_TOKEN: &str = "alice-upstream-token";
/// Bearer token the mock platform accepts for carol (GET-only reader)
pub const CAROL_UPSTREAM_TOKEN: &str = "carol-upstream-token";
/// Bearer token the mock platform answers with 403
pub const FORBIDDEN_UPSTREAM_TOKEN: &str = "forbidden-upstream-token";

#[derive(Clone, Default)]
pub struct MockIdentity {
    pub role_lookups: Arc<AtomicUsize>,
}

impl MockIdentity {
    pub fn lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }
}

fn rule(groups: &[&str], verbs: &[&str], resources: &[&str]) -> DelegationRule {
    let owned = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
    DelegationRule {
        api_groups: owned(groups),
        verbs: owned(verbs),
        resources: owned(resources),
    }
}

async fn mock_global_roles(
    State(mock): State<MockIdentity>,
    Path(user): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    mock.role_lookups.fetch_add(1, Ordering::SeqCst);
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();

    match (token, user.as_str()) {
        // alice holds only a pods-scoped rule: never enough for the gateway
        (ALICE_UPSTREAM_TOKEN, "alice") => Json(vec![GlobalRole {
            name: Some("pod-reader".into()),
            rules: vec![rule(&["*"], &["GET"], &["pods"])],
        }])
        .into_response(),
        (CAROL_UPSTREAM_TOKEN, "carol") => Json(vec![GlobalRole {
            name: Some("reader".into()),
            rules: vec![rule(&["core"], &["GET"], &["*"])],
        }])
        .into_response(),
        (FORBIDDEN_UPSTREAM_TOKEN, _) => StatusCode::FORBIDDEN.into_response(),
        ("garbage-body", _) => "not json".into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

#[derive(serde::Deserialize)]
struct PasswordGrant {
    grant_type: String,
    username: String,
    password: String,
    client_id: Option<String>,
}

async fn mock_token(Form(grant): Form<PasswordGrant>) -> axum::response::Response {
    if grant.grant_type != "password" || grant.client_id.as_deref() != Some("cluster-gate") {
        return (StatusCode::BAD_REQUEST, "bad grant").into_response();
    }
    match (grant.username.as_str(), grant.password.as_str()) {
        ("alice", "alice-pass") => Json(serde_json::json!({
            "access_token": ALICE_UPSTREAM_TOKEN,
            "token_type": "bearer",
        }))
        .into_response(),
        ("alice", "locked") => (StatusCode::LOCKED, "account locked").into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Serve the mock identity platform on an ephemeral port, returns its base URL
pub async fn spawn_identity() -> (String, MockIdentity) {
    let mock = MockIdentity::default();
    let router = Router::new()
        .route("/users/{user}/globalroles", get(mock_global_roles))
        .route("/oauth/token", post(mock_token))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), mock)
}

/// Base URL nothing listens on
pub async fn dead_identity() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
