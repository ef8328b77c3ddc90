//! Shared utilities for the CodeOJ user service.
//!
//! - [`captcha`]: Human-verification gate (hCaptcha)
//! - [`client_ip`]: Client address extractor
//! - [`email`]: Reset-code generation and SMTP delivery
//! - [`serde`]: Custom serde deserialization helpers

pub mod captcha;
pub mod client_ip;
pub mod email;
pub mod serde;
