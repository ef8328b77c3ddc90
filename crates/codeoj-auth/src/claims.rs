//! Session token claim structures.
//!
//! - [`Claims`]: The signed payload carried by every session token
//! - [`SessionIdentity`]: The identity facts a token is minted from
//! - [`IssuedToken`]: An encoded token together with its expiry

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a session token.
///
/// The signature covers every field, including `exp`, so none of these can be
/// altered by the client. Role flags reflect the identity at login time and are
/// carried unchanged through refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Identity ID in string form (subject claim)
    pub sub: String,
    pub username: String,
    pub admin: bool,
    pub teacher: bool,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
}

/// Identity facts a session is minted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
    pub is_teacher: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: i64,
}

impl Claims {
    pub fn for_identity(identity: &SessionIdentity, issued_at: i64, lifetime: i64) -> Self {
        Self {
            sub: identity.user_id.to_string(),
            username: identity.username.clone(),
            admin: identity.is_admin,
            teacher: identity.is_teacher,
            exp: issued_at + lifetime,
            iat: issued_at,
        }
    }

    /// Same subject and role values with a fresh validity window.
    pub fn renewed(&self, issued_at: i64, lifetime: i64) -> Self {
        Self {
            exp: issued_at + lifetime,
            iat: issued_at,
            ..self.clone()
        }
    }
}
