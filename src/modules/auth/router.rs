use axum::{Router, routing::post};

use super::controller::{login, refresh_token};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new().route("/token", post(login).get(refresh_token))
}
