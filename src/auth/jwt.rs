//! JWT token issuance and validation
//! Stateless HS256 access tokens; the server keeps no session state.

use crate::{
    config::AppConfig,
    error::{AppError, AuthError},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Username
    pub username: String,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiration (seconds since epoch)
    pub exp: i64,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: Duration,
}

/// Longest access token lifetime accepted (24h)
pub const MAX_ACCESS_TOKEN_EXP_SECS: u64 = 86_400;

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.jwt_secret.expose_secret().as_bytes(),
            config.security.access_token_exp_secs,
        )
    }

    pub fn new(secret: &[u8], access_token_exp_secs: u64) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        if !(1..=MAX_ACCESS_TOKEN_EXP_SECS).contains(&access_token_exp_secs) {
            return Err(AppError::Config(format!(
                "access token lifetime must be 1..={} seconds, got {}",
                MAX_ACCESS_TOKEN_EXP_SECS, access_token_exp_secs
            )));
        }

        // Expiry is checked by hand after decoding so it can be told apart
        // from signature and structure failures.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_token_ttl: Duration::seconds(access_token_exp_secs as i64),
        })
    }

    /// Issue an access token for the given user
    pub fn issue(&self, user_id: &Uuid, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + self.access_token_ttl;

        self.encode(&Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Sign an arbitrary set of claims
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal(format!("Failed to encode access token: {}", e))
        })
    }

    /// Verify signature, parse claims, then check expiry
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            })?
            .claims;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}
