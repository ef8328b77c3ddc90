//! Middleware and extractors for authenticated routes.
//!
//! # Modules
//!
//! - [`auth`]: Token verification and claims projection
//! - [`role`]: Admin and teacher gates
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::require_token`] verifies the token and stores its claims
//! 3. [`auth::project_claims`] turns the claims into a [`auth::CurrentUser`]
//! 4. Handlers needing elevation call a [`role`] gate before anything else
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::CurrentUser;
//! use crate::middleware::role::require_admin;
//!
//! async fn admin_only(current_user: CurrentUser) -> Result<impl IntoResponse, AppError> {
//!     require_admin(&current_user)?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
