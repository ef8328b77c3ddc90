//! Role gates.
//!
//! Checks run against the projected [`CurrentUser`], so they never touch the
//! credential store. Role flags are whatever the session token carried at
//! login time.

use axum::{extract::FromRequestParts, http::request::Parts};

use codeoj_core::AppError;

use crate::middleware::auth::CurrentUser;

const PERMISSION_DENIED: &str = "Permission denied";

pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::forbidden(PERMISSION_DENIED))
    }
}

/// Teachers and admins pass.
pub fn require_teacher(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_teacher || user.is_admin {
        Ok(())
    } else {
        Err(AppError::forbidden(PERMISSION_DENIED))
    }
}

/// Extractor form of [`require_admin`]. Put it before any body extractor so
/// the gate is decided first.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        require_admin(&user)?;
        Ok(RequireAdmin(user))
    }
}
