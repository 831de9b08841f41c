use crate::error::AppError;
use bcrypt::{hash, verify};

/// Work factor for bcrypt. Cost 12 lands around 100ms per hash, which is the
/// point: slow enough to blunt offline guessing, fast enough for login.
const BCRYPT_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, BCRYPT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
