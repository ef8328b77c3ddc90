use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::middleware::auth::{project_claims, require_token};
use crate::modules::users::controller::{
    change_permissions, get_profile, register, update_profile, usernames,
};
use crate::state::AppState;

/// Routes under `/user` and `/username`. Registration is public; everything
/// else needs a bearer token, and the `/user` routes also need the projected
/// identity.
pub fn init_users_router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/user", post(register));

    let profile = Router::new()
        .route("/user", get(get_profile).patch(update_profile))
        .route("/user/permission", patch(change_permissions))
        .route_layer(middleware::from_fn(project_claims))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    let lookup = Router::new()
        .route("/username", post(usernames))
        .route_layer(middleware::from_fn_with_state(state, require_token));

    public.merge(profile).merge(lookup)
}
