//! User domain models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// User account as held by the credential store
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new record with a fresh id. The hash must already be computed.
    pub fn new(username: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }
}
