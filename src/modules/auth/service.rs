use std::sync::LazyLock;

use codeoj_auth::{AuthError, IssuedToken, SessionIdentity, SessionTokens};
use codeoj_core::{AppError, hash_password, verify_password};
use tracing::instrument;

use super::model::LoginRequest;
use crate::modules::users::model::User;
use crate::modules::users::store::UserStore;

/// Digest checked when the username is unknown, so both failure paths pay
/// for one bcrypt verify at the same cost.
static DUMMY_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("codeoj-dummy-password").ok());

pub struct AuthService;

impl AuthService {
    /// Checks credentials and mints a session token.
    ///
    /// An unknown username and a wrong password fail identically.
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn login(
        users: &dyn UserStore,
        tokens: &SessionTokens,
        dto: LoginRequest,
    ) -> Result<IssuedToken, AppError> {
        let Some(user) = users.find_by_username(&dto.username).await? else {
            if let Some(digest) = DUMMY_DIGEST.as_deref() {
                let _ = verify_password(&dto.password, digest);
            }
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(&dto.password, &user.password)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = tokens.issue(&identity_of(&user))?;
        tracing::info!(user_id = user.id, "Login succeeded");

        Ok(issued)
    }

    /// Re-signs a token that is still inside its refresh window. Role flags
    /// are carried over from the presented token.
    pub fn refresh(tokens: &SessionTokens, token: &str) -> Result<IssuedToken, AppError> {
        Ok(tokens.refresh(token)?)
    }
}

pub fn identity_of(user: &User) -> SessionIdentity {
    SessionIdentity {
        user_id: user.id,
        username: user.username.clone(),
        is_admin: user.is_admin,
        is_teacher: user.is_teacher,
    }
}
