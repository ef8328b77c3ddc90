//! # CodeOJ Core
//!
//! Core types shared by every crate of the CodeOJ user service:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{MIN_PASSWORD_LENGTH, hash_password, is_strong_enough, verify_password};
