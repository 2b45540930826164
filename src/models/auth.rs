//! Authentication-related models

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is a valid regex"));

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "username must be 3 to 50 characters"),
        regex(path = *USERNAME_PATTERN, message = "username may only contain letters, digits and underscores")
    )]
    pub username: String,

    #[validate(length(min = 6, max = 100, message = "password must be 6 to 100 characters"))]
    pub password: String,
}

/// Login request
///
/// Only presence is checked here; anything else is left to the credential
/// lookup so that every bad login gets the same 401.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Token response for register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
