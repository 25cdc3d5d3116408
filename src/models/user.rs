use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::values::{Email, UserId};
use crate::error::AppError;

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    pub static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: String,
    /// bcrypt hash of the user's password.
    pub hashed_password: String,
    /// Inactive users can neither log in nor refresh their tokens.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Builds a new, active user with a freshly generated id.
    pub fn new(email: Email, username: &str, hashed_password: String) -> Result<Self, AppError> {
        let username = validate_username(username)?;
        Ok(Self {
            id: UserId::generate(),
            email,
            username,
            hashed_password,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        })
    }
}

/// Trims the username and checks its length and character set.
pub fn validate_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    let length = username.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        return Err(AppError::ValidationError(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH
        )));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(AppError::ValidationError(
            "Username must be alphanumeric, underscores, or hyphens".into(),
        ));
    }
    Ok(username.to_string())
}

/// Public view of a user as returned by the API. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            username: user.username.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
