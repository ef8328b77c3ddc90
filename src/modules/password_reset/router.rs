use axum::{Router, routing::post};

use super::controller::{forget_password, reset_password};
use crate::state::AppState;

pub fn init_password_reset_router() -> Router<AppState> {
    Router::new()
        .route("/forget_password", post(forget_password))
        .route("/reset_password", post(reset_password))
}
