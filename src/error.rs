//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::StoreError;

/// 令牌校验失败的具体原因
///
/// 仅用于日志和测试；对客户端统一表现为 401。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing or malformed bearer credentials")]
    MissingToken,

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("token is structurally invalid")]
    Malformed,

    #[error("token has expired")]
    Expired,
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UsernameTaken | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::UsernameTaken => "Username already exists".to_string(),
            AppError::ServiceUnavailable(_) => "User registration failed".to_string(),
            AppError::Unauthorized => "Authentication failed".to_string(),
            AppError::NotFound(msg) => format!("Resource not found: {}", msg),
            AppError::Validation(msg) => msg.clone(),
            AppError::Store(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    // 便捷方法
    pub fn not_found(msg: &str) -> Self {
        AppError::NotFound(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        AppError::Validation(msg.to_string())
    }

    pub fn service_unavailable(msg: &str) -> Self {
        AppError::ServiceUnavailable(msg.to_string())
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.user_message(),
                request_id,
            },
        };

        // 服务端错误记 error，客户端错误记 warn
        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Application error"
            );
        } else {
            tracing::warn!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// 令牌错误统一折叠为 401，不泄露失败原因
impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::Unauthorized
    }
}

/// 从 validator::ValidationErrors 转换
impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
