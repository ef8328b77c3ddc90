use anyhow::anyhow;
use codeoj_core::{AppError, hash_password};
use tracing::instrument;

use super::model::{
    ChangePermissionRequest, NewUser, ProfileChanges, RegisterRequest, RoleChanges,
    UpdateProfileRequest, User, UserName, UsernamesRequest, is_valid_username,
};
use super::store::UserStore;

pub struct UserService;

impl UserService {
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn register(users: &dyn UserStore, dto: RegisterRequest) -> Result<User, AppError> {
        if !is_valid_username(&dto.username) {
            return Err(AppError::bad_request(anyhow!(
                "username can only contain letters and numbers"
            )));
        }

        if users.find_by_username(&dto.username).await?.is_some() {
            return Err(AppError::bad_request(anyhow!("username is already used")));
        }

        let user = users
            .create(NewUser {
                username: dto.username,
                password_hash: hash_password(&dto.password)?,
                real_name: dto.real_name,
                email: dto.email,
                student_id: dto.student_id,
                avatar: dto.avatar.unwrap_or_default(),
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    pub async fn get_user(users: &dyn UserStore, id: i64) -> Result<User, AppError> {
        users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("no such user")))
    }

    /// Applies the fields present in `dto`. A new password is hashed before it
    /// reaches the store; role flags and any pending reset code are untouched.
    #[instrument(skip_all, fields(user_id = id))]
    pub async fn update_profile(
        users: &dyn UserStore,
        id: i64,
        dto: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;
        let changes = ProfileChanges {
            real_name: dto.real_name,
            email: dto.email,
            password_hash,
            student_id: dto.student_id,
            avatar: dto.avatar,
        };

        Ok(users.update_profile(id, changes).await?)
    }

    /// Sets the role flags present in `dto` on the target user. Callers must
    /// have passed the admin gate already.
    #[instrument(skip_all, fields(target_user_id = dto.user_id))]
    pub async fn change_permissions(
        users: &dyn UserStore,
        dto: ChangePermissionRequest,
    ) -> Result<User, AppError> {
        let roles = RoleChanges {
            admin: dto.admin,
            teacher: dto.teacher,
        };
        let user = users.update_roles(dto.user_id, roles).await?;

        tracing::info!(
            user_id = user.id,
            is_admin = user.is_admin,
            is_teacher = user.is_teacher,
            "Permissions changed"
        );

        Ok(user)
    }

    pub async fn usernames(
        users: &dyn UserStore,
        dto: UsernamesRequest,
    ) -> Result<Vec<UserName>, AppError> {
        let ids = dto
            .user_id
            .iter()
            .map(|id| id.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AppError::bad_request(anyhow!("user id is invalid")))?;

        Ok(users.usernames_by_ids(&ids).await?)
    }
}
