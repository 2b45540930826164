//! 测试公共模块
//! 提供测试配置、内存存储的应用状态和请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use catalog_api::{
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    middleware::AppState,
    repository::{InMemoryProductRepository, InMemoryUserRepository, UserStore},
    routes,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置（内存存储，低成本哈希参数）
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").ok().map(Secret::new),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()),
            access_token_exp_secs: 300,
            password_hash_memory_kib: 1024,
            password_hash_iterations: 1,
            password_hash_parallelism: 1,
        },
    }
}

/// 使用给定的凭据存储创建应用状态
pub fn create_test_app_state_with(user_store: Arc<dyn UserStore>) -> Arc<AppState> {
    Arc::new(
        AppState::new(
            create_test_config(),
            user_store,
            Arc::new(InMemoryProductRepository::new()),
        )
        .expect("Failed to build app state"),
    )
}

/// 创建测试应用状态
pub fn create_test_app_state() -> Arc<AppState> {
    create_test_app_state_with(Arc::new(InMemoryUserRepository::new()))
}

/// 创建测试应用
pub fn create_test_app() -> Router {
    routes::create_router(create_test_app_state())
}

/// 发送 JSON 请求
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// 读取响应体为 JSON
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// 注册用户并返回访问令牌
pub async fn register_user(app: &Router, username: &str, password: &str) -> String {
    let response = send_json(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = read_json(response).await;
    json["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}

/// 登录
pub async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}
