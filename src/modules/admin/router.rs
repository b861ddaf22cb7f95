use axum::{
    Router,
    routing::{get, patch, post, put},
};

use super::controller::{
    create_admin, delete_student, get_admin_dashboard, get_admins, get_student, get_students,
    toggle_admin_status, update_admin_permissions,
};
use crate::state::AppState;

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/overview", get(get_admin_dashboard))
        .route("/students", get(get_students))
        .route("/students/{id}", get(get_student).delete(delete_student))
        .route("/admins", post(create_admin).get(get_admins))
        .route("/admins/{id}/permissions", put(update_admin_permissions))
        .route("/admins/{id}/toggle-status", patch(toggle_admin_status))
}
