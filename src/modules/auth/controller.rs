use axum::{Json, extract::State, http::HeaderMap};
use tracing::instrument;
use utoipa::ToSchema;

use codeoj_core::AppError;

use super::model::{LoginRequest, TokenResponse};
use super::service::AuthService;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Log in and receive a session token
#[utoipa::path(
    post,
    path = "/api/v1/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Incorrect username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = AuthService::login(state.users.as_ref(), &state.tokens, dto).await?;
    Ok(Json(TokenResponse::try_from(issued)?))
}

/// Refresh a session token
///
/// The presented token may already be expired as long as it is still inside
/// the refresh window.
#[utoipa::path(
    get,
    path = "/api/v1/token",
    responses(
        (status = 200, description = "New token issued", body = TokenResponse),
        (status = 401, description = "Missing, invalid or too old token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = AuthService::refresh(&state.tokens, bearer_token(&headers)?)?;
    Ok(Json(TokenResponse::try_from(issued)?))
}
