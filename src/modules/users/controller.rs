use axum::{Json, extract::State};
use tracing::instrument;

use codeoj_core::AppError;

use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::password_reset::model::MessageResponse;
use crate::modules::users::model::{
    ChangePermissionRequest, ProfileResponse, RegisterRequest, RegisterResponse,
    UpdateProfileRequest, UsernamesRequest, UsernamesResponse,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/user",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Incomplete or invalid data, or username taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user = UserService::register(state.users.as_ref(), dto).await?;

    Ok(Json(RegisterResponse {
        message: "register success".to_string(),
        user_id: user.id.to_string(),
    }))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "User profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = current_user.user_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), current_user.user_id).await?;
    Ok(Json(ProfileResponse::from(user)))
}

/// Update the caller's profile
#[utoipa::path(
    patch,
    path = "/api/v1/user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(user_id = current_user.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::update_profile(state.users.as_ref(), current_user.user_id, dto).await?;
    Ok(Json(MessageResponse::new("update success")))
}

/// Grant or revoke admin and teacher roles
#[utoipa::path(
    patch,
    path = "/api/v1/user/permission",
    request_body = ChangePermissionRequest,
    responses(
        (status = 200, description = "Permissions changed", body = MessageResponse),
        (status = 400, description = "Invalid data", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Target user not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(admin_id = admin.user_id))]
pub async fn change_permissions(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<ChangePermissionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_permissions(state.users.as_ref(), dto).await?;
    Ok(Json(MessageResponse::new("Success")))
}

/// Look up usernames for a batch of user ids
#[utoipa::path(
    post,
    path = "/api/v1/username",
    request_body = UsernamesRequest,
    responses(
        (status = 200, description = "Usernames for the ids that exist", body = UsernamesResponse),
        (status = 400, description = "Invalid ids", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn usernames(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UsernamesRequest>,
) -> Result<Json<UsernamesResponse>, AppError> {
    let user_list = UserService::usernames(state.users.as_ref(), dto).await?;
    Ok(Json(UsernamesResponse { user_list }))
}
