use axum::{Json, extract::State};
use tracing::instrument;

use codeoj_core::AppError;

use super::model::{ForgetPasswordRequest, MessageResponse, ResetPasswordRequest};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::client_ip::ClientIp;
use crate::validator::ValidatedJson;

/// Request a password-reset code by email
#[utoipa::path(
    post,
    path = "/api/v1/forget_password",
    request_body = ForgetPasswordRequest,
    responses(
        (status = 200, description = "Code sent if the account exists", body = MessageResponse),
        (status = 400, description = "Incomplete data or captcha rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Password Reset"
)]
#[instrument(skip_all)]
pub async fn forget_password(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    ValidatedJson(dto): ValidatedJson<ForgetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .password_reset()
        .request_reset(dto, &client_ip)
        .await?;

    Ok(Json(MessageResponse::new("Email sent")))
}

/// Set a new password using an emailed code
#[utoipa::path(
    post,
    path = "/api/v1/reset_password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Incomplete data, wrong or expired code, or weak password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Password Reset"
)]
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.password_reset().consume_reset(dto).await?;

    Ok(Json(MessageResponse::new("Success")))
}
