//! 请求提取器：JSON 反序列化 + validator 校验，路径参数解析
//! 拒绝统一走 AppError，响应体始终是 JSON 错误格式

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// 反序列化并校验请求体，任一步失败都返回 400
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value.validate()?;

        Ok(Self(value))
    }
}

/// 解析路径参数，失败时返回 400 且不回显解析细节
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "Path parameter rejected");
                AppError::validation("invalid path parameter")
            })?;

        Ok(Self(value))
    }
}
