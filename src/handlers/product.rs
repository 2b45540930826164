//! 商品管理的 HTTP 处理器

use crate::{
    error::AppError,
    extract::{ValidatedJson, ValidatedPath},
    middleware::AppState,
    models::product::*,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 创建商品
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_service.create(&req).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// 列出商品
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.product_service.list().await?;

    Ok(Json(products))
}

/// 获取商品详情
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_service.get(id).await?;

    Ok(Json(product))
}

/// 更新商品
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_service.update(id, &req).await?;

    Ok(Json(product))
}

/// 删除商品
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.product_service.delete(id).await?;

    Ok(Json(json!({"message": "Product deleted successfully"})))
}
