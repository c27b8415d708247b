#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use doe_api::auth::{AppState, AppStateInner};
use doe_api::seed::{self, AdminCredentials};
use doe_db::Database;

pub const ADMIN_PASSWORD: &str = "12345678";

/// Full router over a fresh database file with the administrator seeded.
pub struct TestApp {
    router: Router,
    path: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("doe_api_test_{}.db", uuid::Uuid::new_v4()));
        let db = Database::open(&path).expect("open test database");
        seed::ensure_admin(
            &db,
            &AdminCredentials {
                email: "admin@doe1real.local".into(),
                password: ADMIN_PASSWORD.into(),
            },
        )
        .expect("seed admin");

        let state: AppState = Arc::new(AppStateInner {
            db,
            jwt_secret: "test-secret".into(),
            token_ttl: chrono::Duration::hours(1),
        });

        Self {
            router: doe_api::router(state),
            path,
        }
    }

    /// The database file behind the router, for tests that tamper with it.
    pub fn db_path(&self) -> &std::path::Path {
        &self.path
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, token).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/register",
            serde_json::json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/login",
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn donate(&self, username: &str, amount: Value) -> (StatusCode, Value) {
        self.post(
            "/api/donate",
            serde_json::json!({ "username": username, "amount": amount }),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login("admin", ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}
