//! Shared harness for the HTTP tests: an in-memory store behind the real
//! router, signed in as the configured account.

use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use loom_server::state::{AuthSettings, StoreBackend, StoreSettings};
use loom_server::{router, AppState, ServerConfig, StoreState};
use loom_store::Store;

pub const EMAIL: &str = "owner@loom.pk";
pub const PASSWORD: &str = "correct horse";

pub fn config() -> ServerConfig {
    ServerConfig {
        store: StoreSettings {
            backend: StoreBackend::Memory,
            ..StoreSettings::default()
        },
        auth: AuthSettings {
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
            jwt_secret: "integration-test-secret".to_string(),
            ..AuthSettings::default()
        },
        ..ServerConfig::default()
    }
}

pub struct TestApp {
    router: Router,
    pub store: Store,
    token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Store::memory();
        let state = AppState::new(config(), StoreState::Ready(store.clone())).unwrap();
        let mut app = TestApp {
            router: router(state),
            store,
            token: String::new(),
        };

        let (status, session) = app
            .send(
                Method::POST,
                "/api/auth/login",
                Some(serde_json::json!({"email": EMAIL, "password": PASSWORD})),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{session}");
        app.token = session["accessToken"].as_str().unwrap().to_string();
        app
    }

    /// A router whose store never opened.
    pub fn degraded() -> Router {
        let state = AppState::new(
            config(),
            StoreState::Unavailable {
                reason: "disk full".to_string(),
            },
        )
        .unwrap();
        router(state)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, body, token).await;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        send_to(&self.router, method, uri, body, token).await
    }

    /// For requests that are not JSON.
    pub async fn oneshot(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Signed-in JSON request.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(self.token())).await
    }
}

pub async fn send_to(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    router.clone().oneshot(request).await.unwrap()
}
