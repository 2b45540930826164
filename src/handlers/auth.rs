//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    extract::ValidatedJson,
    middleware::AppState,
    models::auth::*,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access_token = state
        .auth_service
        .register(&req.username, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { access_token })))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access_token = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(TokenResponse { access_token }))
}

/// 获取当前令牌中的身份信息
pub async fn profile(auth_context: AuthContext) -> Result<impl IntoResponse, AppError> {
    Ok(Json(auth_context.claims))
}
