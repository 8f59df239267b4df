//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use stride_api::app::{Stores, build_app, build_state_with};
use stride_auth::JwtEncoder;
use stride_cache::provider::CacheManager;
use stride_core::config::AppConfig;
use stride_database::memory::MemoryStore;
use stride_entity::User;
use stride_notify::Notifier;

/// A request outcome: status plus parsed JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// Asserts `success: true` and returns the body.
    pub fn expect_success(self, expected: StatusCode) -> Value {
        assert_eq!(self.status, expected, "body: {}", self.body);
        assert_eq!(self.body["success"], Value::Bool(true), "body: {}", self.body);
        self.body
    }

    /// Asserts an error status and the machine-readable code.
    pub fn expect_error(self, expected: StatusCode, code: &str) {
        assert_eq!(self.status, expected, "body: {}", self.body);
        assert_eq!(self.body["code"], code, "body: {}", self.body);
        assert_eq!(self.body["success"], Value::Bool(false), "body: {}", self.body);
    }
}

/// Test application over an in-memory store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The shared store, for direct seeding
    pub store: Arc<MemoryStore>,
    encoder: JwtEncoder,
}

/// Configuration used by tests: memory backends, rate limiting off.
pub fn test_config() -> AppConfig {
    config_with(serde_json::json!({
        "server": {},
        "database": { "backend": "memory", "url": "" },
        "cache": {},
        "auth": { "jwt_secret": "integration-test-secret", "jwt_access_ttl_minutes": 60 },
        "rate_limit": { "enabled": false },
        "notify": {},
        "logging": {},
    }))
}

/// Builds an `AppConfig` from a JSON value. Sections not under test stay `{}`.
pub fn config_with(value: Value) -> AppConfig {
    serde_json::from_value(value).expect("test config must deserialize")
}

impl TestApp {
    /// Create a new test application with the default test config.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application with an explicit config.
    pub async fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(
            CacheManager::new(&config.cache)
                .await
                .expect("memory cache init"),
        );
        let notifier = Notifier::new(&config.notify).expect("notifier init");
        let encoder = JwtEncoder::new(&config.auth);

        let state = build_state_with(config, Stores::in_memory(store.clone()), cache, notifier);

        Self {
            router: build_app(state),
            store,
            encoder,
        }
    }

    /// Seed a user and return their id.
    pub async fn seed_user(&self, username: &str) -> Uuid {
        self.seed_user_with_level(username, 0).await
    }

    /// Seed a user with a given level and return their id.
    pub async fn seed_user_with_level(&self, username: &str, level: i32) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            display_name: None,
            email: Some(format!("{username}@example.com")),
            level,
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.store.seed_user(user).await;
        id
    }

    /// Mint a valid bearer token for a seeded user.
    pub fn token_for(&self, user_id: Uuid, username: &str) -> String {
        let (token, _) = self
            .encoder
            .generate_access_token(user_id, username)
            .expect("token generation");
        token
    }

    /// Issue one request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router oneshot");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
