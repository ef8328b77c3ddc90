//! # CodeOJ Auth
//!
//! Session tokens for the CodeOJ user service.
//!
//! - [`claims`]: The signed claim set and the identity it is minted from
//! - [`error`]: Token and credential failures
//! - [`jwt`]: [`SessionTokens`], the issuer/verifier
//!
//! The server keeps no session state: every authenticated request is trusted
//! purely on the strength of a token that [`SessionTokens::verify`] accepts.

pub mod claims;
pub mod error;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, IssuedToken, SessionIdentity};
pub use error::AuthError;
pub use jwt::SessionTokens;
