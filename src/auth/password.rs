//! Password hashing and verification using Argon2id

use crate::{config::AppConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable parameters
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with the argon2 crate's recommended parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }

    /// Create hasher with explicit cost parameters
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 params: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let security = &config.security;
        Self::with_params(
            security.password_hash_memory_kib,
            security.password_hash_iterations,
            security.password_hash_parallelism,
        )
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored hash.
    ///
    /// Any failure, including an unparsable hash, counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Failed to parse password hash: {:?}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
