//! # CodeOJ User Service
//!
//! JSON REST backend for user identity: registration, login, profile editing,
//! role changes, and a captcha-gated password reset by emailed code.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Admin bootstrap command
//! ├── middleware/       # Token stage, claims projection, role gates
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login and token refresh
//! │   ├── password_reset/ # Reset-code request and consumption
//! │   └── users/       # Registration, profile, permissions, credential store
//! └── utils/           # Captcha gate, reset-code sender, client address
//! ```
//!
//! Each feature module follows the same structure:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic
//! - `model.rs`: Data models and DTOs
//! - `router.rs`: Axum router configuration
//!
//! ## Authentication
//!
//! Sessions are stateless HS512 JWTs carrying the user id, username and the
//! `admin`/`teacher` flags. A token can be refreshed for a grace period past
//! its expiry; role flags are copied forward on refresh, so role changes only
//! reach a session at its next login.
//!
//! ## Modules
//!
//! - [`cli`]: Command-line administration
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Request logging and tracing setup
//! - [`middleware`]: Authentication and authorization middleware
//! - [`modules`]: Feature modules
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`utils`]: Shared utilities
//! - [`validator`]: Request validation

pub mod cli;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use codeoj_auth;
pub use codeoj_config;
pub use codeoj_core;
pub use codeoj_db;
