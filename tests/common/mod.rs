#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use vitrina::router::init_router;
use vitrina::state::AppState;
use vitrina_auth::create_access_token;
use vitrina_cache::MemoryThrottleStore;
use vitrina_config::{CorsConfig, JwtConfig, RateLimitConfig};
use vitrina_db::MemoryStore;
use vitrina_models::{NewProduct, NewUser, Product, Role, UserId};

pub const TEST_PASSWORD: &str = "Tr1cky-Garden-42";

pub struct TestUser {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Config for tests: both throttles off, client IP read from `X-Forwarded-For`.
pub fn test_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        trust_proxy_headers: true,
        ..RateLimitConfig::disabled()
    }
}

pub fn test_state_with(rate_limit_config: RateLimitConfig) -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryThrottleStore::new()),
        JwtConfig::default(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit_config,
    )
}

pub fn test_state() -> AppState {
    test_state_with(test_rate_limit_config())
}

pub fn test_app(state: &AppState) -> Router {
    init_router(state.clone())
}

/// Inserts a user directly into the store, hashed at the cheapest bcrypt cost.
pub async fn create_test_user(state: &AppState, username: &str, role: Role) -> TestUser {
    let user = state
        .store
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
            phone: String::new(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
        })
        .await
        .unwrap();

    TestUser {
        id: user.id,
        username: user.username,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

pub fn access_token(state: &AppState, user: &TestUser) -> String {
    create_access_token(user.id, &user.username, user.role, &state.jwt_config).unwrap()
}

pub async fn create_test_product(state: &AppState, owner: &TestUser, is_public: bool) -> Product {
    state
        .store
        .create_product(NewProduct {
            name: format!("Product of {}", owner.username),
            price: Decimal::new(1999, 2),
            stock: 5,
            owner_id: owner.id,
            is_public,
        })
        .await
        .unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "198.51.100.7");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A login request coming from `ip`.
pub fn login_request(ip: &str, username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/login/")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
