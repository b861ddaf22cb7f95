use axum::{
    Router,
    routing::{delete, get, put},
};

use super::controller::{change_password, delete_account, get_student_dashboard};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_student_dashboard))
        .route("/password", put(change_password))
        .route("/delete", delete(delete_account))
}
