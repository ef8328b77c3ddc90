use anyhow::anyhow;

use codeoj_core::is_strong_enough;

use crate::modules::users::model::{RegisterRequest, RoleChanges, User, is_valid_username};
use crate::modules::users::service::UserService;
use crate::modules::users::store::UserStore;

/// Registers `username` and grants it admin. Used to bootstrap the first
/// administrator, since the permission endpoint itself needs an admin.
pub async fn create_admin(
    users: &dyn UserStore,
    username: &str,
    password: &str,
    email: &str,
) -> anyhow::Result<User> {
    if !is_valid_username(username) {
        return Err(anyhow!("username can only contain letters and numbers"));
    }
    if !is_strong_enough(password) {
        return Err(anyhow!("password is too short, at least 6 characters"));
    }

    let user = UserService::register(
        users,
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            real_name: username.to_string(),
            student_id: "admin".to_string(),
            avatar: None,
        },
    )
    .await
    .map_err(|e| e.error)?;

    let roles = RoleChanges {
        admin: Some(true),
        teacher: None,
    };

    Ok(users.update_roles(user.id, roles).await?)
}
