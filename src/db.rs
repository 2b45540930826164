//! PostgreSQL 后端启动
//! 仅在配置了 database.url 时使用；连接成功后立即应用启动 schema

use crate::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database.url is not configured")]
    NotConfigured,

    #[error("cannot reach postgres: {0}")]
    Unreachable(#[source] sqlx::Error),

    #[error("bootstrap schema failed: {0}")]
    Schema(#[source] MigrateError),
}

/// 连接数据库并确保 users / products 表存在
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let url = config.url.as_ref().ok_or(DbError::NotConfigured)?;

    let pool = pool_options(config)
        .connect(url.expose_secret())
        .await
        .map_err(DbError::Unreachable)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(DbError::Schema)?;

    tracing::info!(
        max_connections = config.max_connections,
        "Postgres store ready"
    );

    Ok(pool)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
}
