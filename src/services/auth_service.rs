//! 认证服务：注册、登录

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::user::User,
    repository::{StoreError, UserStore},
};
use std::sync::Arc;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_service: Arc<JwtService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            jwt_service,
            hasher,
        }
    }

    /// 用户登录，成功时返回访问令牌
    ///
    /// 用户不存在与密码错误返回同一个错误，避免用户名被枚举。
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::info!(%username, "Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await {
            tracing::info!(%username, "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.jwt_service.issue(&user.id, &user.username)?;

        tracing::info!(user_id = %user.id, %username, "Login succeeded");

        Ok(access_token)
    }

    /// 用户注册，成功后立即登录并返回访问令牌
    pub async fn register(&self, username: &str, password: &str) -> Result<String, AppError> {
        let existing = self
            .users
            .find_by_username(username)
            .await
            .map_err(|e| registration_failed(username, e))?;
        if existing.is_some() {
            tracing::info!(%username, "Registration rejected: username taken");
            return Err(AppError::UsernameTaken);
        }

        let password_hash = self.hash_password(password).await?;

        // 预检查之后仍可能出现并发注册，由存储层唯一约束兜底
        let user = self
            .users
            .insert(User::new(username, password_hash))
            .await
            .map_err(|e| registration_failed(username, e))?;

        tracing::info!(user_id = %user.id, %username, "User registered");

        self.login(username, password).await.map_err(|e| {
            tracing::error!(%username, error = %e, "Login after registration failed");
            AppError::service_unavailable("login after registration failed")
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("password verification task failed: {}", e);
                false
            })
    }
}

fn registration_failed(username: &str, e: StoreError) -> AppError {
    match &e {
        StoreError::Conflict => {
            tracing::warn!(%username, "Registration lost a uniqueness race");
        }
        StoreError::Database(err) => {
            tracing::error!(%username, error = %err, "Registration storage failure");
        }
    }
    AppError::service_unavailable(&e.to_string())
}
