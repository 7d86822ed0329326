#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use chirpy::{
    ServerConfig, cli::Platform, clock::ManualClock, create_app, db::Database,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";
pub const START: u64 = 1_700_000_000;

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub clock: Arc<ManualClock>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
    pub text: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_platform(Platform::Prod).await
    }

    pub async fn with_platform(platform: Platform) -> Self {
        let db = Database::open(":memory:")
            .await
            .expect("Failed to open test database");
        let clock = Arc::new(ManualClock::new(START));
        let config = ServerConfig {
            db: db.clone(),
            jwt_secret: JWT_SECRET.to_vec(),
            polka_key: POLKA_KEY.to_string(),
            platform,
            clock: clock.clone(),
        };
        Self {
            app: create_app(&config),
            db,
            clock,
        }
    }

    /// Send a request. `bearer` goes into `Authorization: Bearer ...`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.dispatch(builder, body).await
    }

    /// Send a request with arbitrary extra headers.
    pub async fn send_with_headers(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.dispatch(builder, body).await
    }

    async fn dispatch(
        &self,
        mut builder: axum::http::request::Builder,
        body: Option<Value>,
    ) -> TestResponse {
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
            text,
        }
    }

    pub async fn create_user(&self, email: &str, password: &str) -> Value {
        let res = self
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text);
        res.json
    }

    /// Log in and return the full login response body.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let res = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text);
        res.json
    }

    /// Register and log in, returning `(access_token, refresh_token, user_id)`.
    pub async fn signed_in_user(&self, email: &str) -> (String, String, String) {
        self.create_user(email, "password123").await;
        let session = self.login(email, "password123").await;
        (
            session["token"].as_str().unwrap().to_string(),
            session["refresh_token"].as_str().unwrap().to_string(),
            session["id"].as_str().unwrap().to_string(),
        )
    }
}

impl TestResponse {
    pub fn code(&self) -> &str {
        self.json["code"].as_str().unwrap_or_default()
    }
}
