use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};
use codeoj_core::AppError;
use serde_json::json;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::router::init_auth_router;
use crate::modules::password_reset::model::MessageResponse;
use crate::modules::password_reset::router::init_password_reset_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

/// Health check; also round-trips the credential store
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Service and store are up", body = MessageResponse),
        (status = 500, description = "Credential store unreachable", body = ErrorResponse)
    ),
    tag = "Health"
)]
pub async fn ping(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    state.users.ping().await?;
    Ok(Json(MessageResponse::new("pong")))
}

async fn page_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Page not found" })),
    )
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/ping", get(ping))
        .nest(
            "/api/v1",
            Router::new()
                .merge(init_auth_router())
                .merge(init_password_reset_router())
                .merge(init_users_router(state.clone())),
        )
        .fallback(page_not_found)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}
