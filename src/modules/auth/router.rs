use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::rate_limit::login_throttle_middleware;
use crate::modules::auth::controller::{protected, refresh_token, token_login};
use crate::router::route_both;
use crate::state::AppState;

/// `POST /api/login/`, guarded by the per-IP login throttle only.
pub fn init_login_router(state: &AppState) -> Router<AppState> {
    let login = post(token_login).route_layer(middleware::from_fn_with_state(
        state.clone(),
        login_throttle_middleware,
    ));

    route_both(Router::new(), "/api/login", login)
}

pub fn init_auth_router() -> Router<AppState> {
    let router = route_both(Router::new(), "/api/refresh", post(refresh_token));
    route_both(router, "/api/protected", get(protected))
}
