//! Database repository layer

pub mod product_repo;
pub mod user_repo;

pub use product_repo::*;
pub use user_repo::*;

use thiserror::Error;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 唯一约束冲突（例如用户名重复）
    #[error("unique constraint violated")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// 将唯一约束冲突识别为 Conflict，其余保持为数据库错误
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Database(e),
        }
    }
}

/// 存储后端健康状态，供就绪探针使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}
