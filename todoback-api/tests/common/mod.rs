//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An application over in-memory repositories
//! - A request helper that collects status, headers and body
//! - User creation and login through the public endpoints

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use todoback_api::app::{build_router, AppState};
use todoback_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use todoback_shared::repository::Repositories;
use tower::Service as _;
use uuid::Uuid;

pub const PASSWORD: &str = "p@ssW0rd1";

/// Test context containing the router and the state behind it
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
}

/// Collected response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!("body is not JSON ({}): {}", e, self.text())
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// ID at the end of the `Location` header
    pub fn location_id(&self) -> Uuid {
        let location = self.header(header::LOCATION).expect("missing Location header");
        let id = location.rsplit('/').next().unwrap();
        Uuid::parse_str(id).unwrap()
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "todoback_test".to_string(),
            url_override: None,
            max_connections: 1,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-of-32-chars!!".to_string(),
        },
    }
}

impl TestContext {
    /// Fresh application over empty in-memory repositories
    pub fn new() -> Self {
        Self::with_repositories(Repositories::in_memory())
    }

    pub fn with_repositories(repositories: Repositories) -> Self {
        let state = AppState::from_repositories(test_config(), repositories, None);
        let app = build_router(state.clone());
        Self { app, state }
    }

    /// Sends one request; `cookie` is a full `name=value` pair
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    /// Sends a raw request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(cookie), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(cookie), Some(body)).await
    }

    pub async fn put(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(cookie), None).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(cookie), None).await
    }

    /// Creates a user through `POST /api/v1/users`
    pub async fn create_user(&self, login: &str, email: &str) -> Uuid {
        let body = serde_json::json!({ "login": login, "email": email, "password": PASSWORD });
        let response = self
            .request(Method::POST, "/api/v1/users", None, Some(body))
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.location_id()
    }

    /// Logs in and returns the session cookie as `session_id=<token>`
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .request(Method::POST, "/api/v1/auth/login", None, Some(body))
            .await;

        assert_eq!(response.status, StatusCode::OK, "{}", response.text());

        let set_cookie = response
            .header(header::SET_COOKIE)
            .expect("login did not set a cookie");
        set_cookie.split(';').next().unwrap().trim().to_string()
    }

    /// Creates a user, logs it in and returns its ID and session cookie
    pub async fn signed_in_user(&self, login: &str) -> (Uuid, String) {
        let email = format!("{}@x.io", login);
        let id = self.create_user(login, &email).await;
        let cookie = self.login(&email, PASSWORD).await;
        (id, cookie)
    }
}
