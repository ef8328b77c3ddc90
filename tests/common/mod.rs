#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use codeoj_user::codeoj_auth::SessionTokens;
use codeoj_user::codeoj_config::{JwtConfig, ResetConfig};
use codeoj_user::codeoj_core::hash_password;
use codeoj_user::modules::users::model::{NewUser, ProfileChanges, RoleChanges, User, UserName};
use codeoj_user::modules::users::store::{MemoryUserStore, StoreError, UserStore};
use codeoj_user::router::init_router;
use codeoj_user::state::AppState;
use codeoj_user::utils::captcha::{CaptchaVerdict, CaptchaVerifier};
use codeoj_user::utils::email::ResetCodeSender;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_RESET_CODE: &str = "123456";

pub fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        timeout: 14_400,
        max_refresh: 3_600,
    }
}

/// Captcha gate with a fixed answer.
pub struct StubCaptcha(pub CaptchaVerdict);

#[async_trait]
impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, _token: &str, _remote_ip: &str) -> anyhow::Result<CaptchaVerdict> {
        Ok(self.0.clone())
    }
}

/// Sender that always "delivers" [`TEST_RESET_CODE`].
pub struct StubSender;

#[async_trait]
impl ResetCodeSender for StubSender {
    async fn send_code(&self, _to_email: &str) -> anyhow::Result<String> {
        Ok(TEST_RESET_CODE.to_string())
    }
}

/// Store whose every call fails as if the database were unreachable.
pub struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for UnreachableStore {
    async fn create(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, StoreError> {
        Err(unreachable())
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Err(unreachable())
    }

    async fn update_profile(&self, _id: i64, _changes: ProfileChanges) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn update_roles(&self, _id: i64, _roles: RoleChanges) -> Result<User, StoreError> {
        Err(unreachable())
    }

    async fn begin_reset(
        &self,
        _id: i64,
        _code: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Err(unreachable())
    }

    async fn complete_reset(
        &self,
        _id: i64,
        _code: &str,
        _now: DateTime<Utc>,
        _password_hash: &str,
    ) -> Result<bool, StoreError> {
        Err(unreachable())
    }

    async fn usernames_by_ids(&self, _ids: &[i64]) -> Result<Vec<UserName>, StoreError> {
        Err(unreachable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_captcha(CaptchaVerdict::passed())
}

pub fn setup_test_app_with_captcha(verdict: CaptchaVerdict) -> TestApp {
    let users = Arc::new(MemoryUserStore::new());
    let state = AppState {
        users: users.clone(),
        tokens: SessionTokens::new(&get_test_jwt_config()),
        captcha: Arc::new(StubCaptcha(verdict)),
        mailer: Arc::new(StubSender),
        reset_config: ResetConfig::default(),
    };

    TestApp {
        router: init_router(state.clone()),
        state,
        users,
    }
}

/// App whose credential store is unreachable; `users` is an unused empty store.
pub fn setup_app_without_store() -> TestApp {
    let state = AppState {
        users: Arc::new(UnreachableStore),
        tokens: SessionTokens::new(&get_test_jwt_config()),
        captcha: Arc::new(StubCaptcha(CaptchaVerdict::passed())),
        mailer: Arc::new(StubSender),
        reset_config: ResetConfig::default(),
    };

    TestApp {
        router: init_router(state.clone()),
        state,
        users: Arc::new(MemoryUserStore::new()),
    }
}

pub async fn create_test_user(app: &TestApp, username: &str, password: &str, is_admin: bool) -> User {
    let user = app
        .users
        .create(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            real_name: "Test User".to_string(),
            email: format!("{}@test.com", username),
            student_id: "s1001".to_string(),
            avatar: String::new(),
        })
        .await
        .unwrap();

    if is_admin {
        let roles = RoleChanges {
            admin: Some(true),
            teacher: None,
        };
        return app.users.update_roles(user.id, roles).await.unwrap();
    }

    user
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    (status, body)
}

pub async fn login(app: &TestApp, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/token",
            None,
            json!({ "username": username, "password": password }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}
