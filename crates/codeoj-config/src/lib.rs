//! # CodeOJ Config
//!
//! Configuration types for the CodeOJ user service, loaded from environment
//! variables:
//!
//! - [`jwt`]: Session token secret, lifetime and refresh window
//! - [`email`]: SMTP settings and reset-code length
//! - [`captcha`]: hCaptcha verification settings
//! - [`reset`]: Password-reset code lifetime
//!
//! # Example
//!
//! ```ignore
//! use codeoj_config::{CaptchaConfig, EmailConfig, JwtConfig, ResetConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let captcha_config = CaptchaConfig::from_env();
//! let reset_config = ResetConfig::from_env();
//! ```

pub mod captcha;
pub mod email;
pub mod jwt;
pub mod reset;

// Re-export commonly used types at crate root
pub use captcha::{CaptchaConfig, HCAPTCHA_TEST_SECRET};
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use reset::ResetConfig;
