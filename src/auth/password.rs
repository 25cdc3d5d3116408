use crate::error::AppError;
use crate::models::Password;
use bcrypt::{hash, verify};

/// Hashes and verifies passwords with bcrypt at a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    /// Cheapest work factor bcrypt accepts.
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &Password) -> Result<String, AppError> {
        hash(password.expose(), self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// bcrypt compares digests in constant time.
    pub fn verify(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        verify(password, hashed_password)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
