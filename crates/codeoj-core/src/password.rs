//! Password hashing and verification.
//!
//! Digests are bcrypt modular-crypt strings (`$2b$12$...`). The prefix carries
//! the variant and cost, so digests produced under an older cost or variant
//! keep verifying after the cost is raised.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

pub fn is_strong_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}
