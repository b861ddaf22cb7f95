use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_current_user, login_admin, login_student, register_student};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/student/register", post(register_student))
        .route("/student/login", post(login_student))
        .route("/admin/login", post(login_admin))
}

/// Token-authenticated routes; kept out of the credential rate limit.
pub fn init_session_router() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}
