//! 认证 API 集成测试

use axum::http::StatusCode;
use catalog_api::{
    auth::{Claims, JwtService},
    repository::{InMemoryUserRepository, UserStore},
    routes,
};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::{create_test_app, login, read_json, register_user, send_json, TEST_JWT_SECRET};

#[tokio::test]
async fn test_register_returns_token() {
    let app = create_test_app();

    let response = send_json(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": "alice", "password": "s3cret1" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    let token = json["access_token"].as_str().unwrap();
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let app = create_test_app();
    let jwt = JwtService::new(TEST_JWT_SECRET.as_bytes(), 300).unwrap();

    for (username, password) in [("alice", "s3cret1"), ("bob_2", "hunter22"), ("Carol", "p@ss word")] {
        register_user(&app, username, password).await;

        let response = login(&app, username, password).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        let claims = jwt.validate(json["access_token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.username, username);
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();
    register_user(&app, "alice", "s3cret1").await;

    let response = login(&app, "alice", "wrong").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = create_test_app();
    register_user(&app, "alice", "s3cret1").await;

    let wrong_password = login(&app, "alice", "wrong").await;
    let unknown_user = login(&app, "nonexistentuser", "password123").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password = read_json(wrong_password).await;
    let unknown_user = read_json(unknown_user).await;
    assert_eq!(wrong_password["error"]["message"], unknown_user["error"]["message"]);
    assert_eq!(wrong_password["error"]["code"], unknown_user["error"]["code"]);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let state = common::create_test_app_state();
    let store = state.user_store.clone();
    let app = routes::create_router(state);

    register_user(&app, "alice", "s3cret1").await;
    let original = store.find_by_username("alice").await.unwrap().unwrap();

    let response = send_json(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": "alice", "password": "different1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 原用户未被覆盖
    let stored = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.password_hash, original.password_hash);

    assert_eq!(login(&app, "alice", "s3cret1").await.status(), StatusCode::OK);
    assert_eq!(login(&app, "alice", "different1").await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = create_test_app();

    for body in [
        json!({ "username": "al", "password": "s3cret1" }),
        json!({ "username": "alice!", "password": "s3cret1" }),
        json!({ "username": "alice", "password": "123" }),
        json!({ "username": "alice" }),
    ] {
        let response = send_json(&app, "POST", "/auth/register", None, Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = create_test_app();

    let response = send_json(&app, "POST", "/auth/login", None, Some(json!({ "username": "alice" }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_without_token() {
    let app = create_test_app();

    let response = send_json(&app, "GET", "/auth/profile", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_invalid_token() {
    let app = create_test_app();

    let response = send_json(&app, "GET", "/auth/profile", Some("invalidtoken"), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_expired_token() {
    let app = create_test_app();
    let jwt = JwtService::new(TEST_JWT_SECRET.as_bytes(), 300).unwrap();
    let now = chrono::Utc::now().timestamp();

    let token = jwt
        .encode(&Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            iat: now - 600,
            exp: now - 300,
        })
        .unwrap();

    let response = send_json(&app, "GET", "/auth/profile", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_foreign_token() {
    let app = create_test_app();
    let foreign = JwtService::new(b"some-other-deployment-secret-32-chars!", 300).unwrap();
    let token = foreign.issue(&uuid::Uuid::new_v4(), "alice").unwrap();

    let response = send_json(&app, "GET", "/auth/profile", Some(&token), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejections_are_indistinguishable() {
    let app = create_test_app();
    let foreign = JwtService::new(b"some-other-deployment-secret-32-chars!", 300).unwrap();
    let foreign_token = foreign.issue(&uuid::Uuid::new_v4(), "alice").unwrap();

    let missing = read_json(send_json(&app, "GET", "/auth/profile", None, None).await).await;
    let malformed =
        read_json(send_json(&app, "GET", "/auth/profile", Some("invalidtoken"), None).await).await;
    let bad_signature =
        read_json(send_json(&app, "GET", "/auth/profile", Some(&foreign_token), None).await).await;

    assert_eq!(missing["error"]["message"], malformed["error"]["message"]);
    assert_eq!(missing["error"]["message"], bad_signature["error"]["message"]);
    assert_eq!(missing["error"]["code"], 401);
}

#[tokio::test]
async fn test_register_login_profile_flow() {
    let app = create_test_app();

    let register_token = register_user(&app, "alice", "s3cret1").await;
    assert!(!register_token.is_empty());

    assert_eq!(login(&app, "alice", "wrong").await.status(), StatusCode::UNAUTHORIZED);

    let response = login(&app, "alice", "s3cret1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = read_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(&app, "GET", "/auth/profile", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let profile = read_json(response).await;
    assert_eq!(profile["username"], "alice");
    assert!(profile["sub"].is_string());
    assert!(profile["exp"].as_i64().unwrap() > profile["iat"].as_i64().unwrap());
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_sub_matches_stored_user() {
    let store = Arc::new(InMemoryUserRepository::new());
    let app = routes::create_router(common::create_test_app_state_with(store.clone()));

    let token = register_user(&app, "profileuser", "profilepass123").await;
    let user = store.find_by_username("profileuser").await.unwrap().unwrap();

    let profile = read_json(send_json(&app, "GET", "/auth/profile", Some(&token), None).await).await;

    assert_eq!(profile["sub"], user.id.to_string());
}
