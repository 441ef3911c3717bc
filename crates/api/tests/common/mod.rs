#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use grocerific_api::config::{AllowedOrigins, ServerConfig};
use grocerific_api::router::build_app_router;
use grocerific_api::state::AppState;
use grocerific_db::{ItemStore, MemoryItemStore};

/// Build a test `ServerConfig` with safe defaults (any CORS origin, no
/// database, 30-second request timeout).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: AllowedOrigins::Any,
        request_timeout_secs: 30,
        database_url: None,
        database_max_connections: 1,
        demo_session_ttl_secs: 1440,
    }
}

/// Build the full application router with `store` injected behind `/api`.
pub fn build_test_app(store: Arc<dyn ItemStore>) -> Router {
    build_app_router(AppState::with_store(test_config(), None, Some(store)))
}

/// A fresh empty in-memory store, ready to hand to [`build_test_app`].
pub fn memory_store() -> Arc<dyn ItemStore> {
    Arc::new(MemoryItemStore::new())
}

/// Router whose `/api` has no backing store, as when no database is set.
pub fn build_unconfigured_app() -> Router {
    build_app_router(AppState::with_store(test_config(), None, None))
}

/// Router backed by a real PostgreSQL pool.
pub fn build_db_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(test_config(), Some(pool)))
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, json: Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(json), None).await
}

pub async fn put_json(app: Router, uri: &str, json: Value) -> Response<Body> {
    request(app, Method::PUT, uri, Some(json), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, None, None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A client bound to one item API surface, carrying the demo session
/// cookie when there is one.
pub struct Client {
    app: Router,
    path: &'static str,
    cookie: Option<String>,
}

impl Client {
    /// Client for `/api` backed by `store`.
    pub fn durable(store: Arc<dyn ItemStore>) -> Self {
        Self {
            app: build_test_app(store),
            path: "/api",
            cookie: None,
        }
    }

    /// Client for `/demo-api` holding an open session.
    pub async fn demo() -> Self {
        let app = build_unconfigured_app();
        let response = get(app.clone(), "/demo-api?action=items").await;
        let cookie = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string);
        assert!(cookie.is_some(), "demo API must open a session");
        Self {
            app,
            path: "/demo-api",
            cookie,
        }
    }

    /// Send a request with `query` appended to the surface path and decode
    /// the JSON envelope.
    pub async fn call(
        &self,
        method: Method,
        query: &str,
        body: Option<Value>,
    ) -> (axum::http::StatusCode, Value) {
        let uri = format!("{}?{query}", self.path);
        let response = request(
            self.app.clone(),
            method,
            &uri,
            body,
            self.cookie.as_deref(),
        )
        .await;
        let status = response.status();
        (status, body_json(response).await)
    }
}
