//! User repository (数据库访问层)

use crate::models::user::User;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{HealthStatus, StoreError};

/// 凭据存储
///
/// `insert` 必须在用户名已存在时返回 `StoreError::Conflict`，而不是覆盖原记录。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// 写入新用户
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    /// 存储后端健康状态
    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

/// PostgreSQL 实现
pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        // 用户名唯一性由 users.username 的 UNIQUE 约束最终保证
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn health_check(&self) -> HealthStatus {
        metrics::gauge!("catalog_db_pool_connections").set(self.db.size() as f64);
        metrics::gauge!("catalog_db_pool_idle").set(self.db.num_idle() as f64);

        match sqlx::query("SELECT 1").execute(&self.db).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => {
                tracing::warn!(error = %e, "Credential store unreachable");
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }
}

/// 内存实现，用于未配置数据库的本地运行和测试
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}
