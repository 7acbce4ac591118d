use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::users::controller::{
    change_password, create_user, delete_user, get_user, list_users, logout, me, patch_user,
    session_login, update_user,
};
use crate::router::route_both;
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    let router = route_both(
        Router::new(),
        "/api/users",
        get(list_users).post(create_user),
    );
    let router = route_both(router, "/api/users/me", get(me));
    let router = route_both(router, "/api/users/change_password", post(change_password));
    let router = route_both(router, "/api/users/login", post(session_login));
    let router = route_both(router, "/api/users/logout", post(logout));
    route_both(
        router,
        "/api/users/{id}",
        get(get_user)
            .put(update_user)
            .patch(patch_user)
            .delete(delete_user),
    )
}
