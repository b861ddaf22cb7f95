use axum::{
    Router,
    routing::{get, patch, post},
};

use super::controller::{
    assign_complaint, create_complaint, get_complaint, get_complaints, get_home_stats,
    get_my_complaints, get_recent_public, get_stats, rate_complaint, update_status,
};
use crate::state::AppState;

pub fn init_complaints_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_complaint).get(get_complaints))
        .route("/my", get(get_my_complaints))
        .route("/stats/overview", get(get_stats))
        .route("/stats/home/overview", get(get_home_stats))
        .route("/recent/public", get(get_recent_public))
        .route("/{id}", get(get_complaint))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/assign", patch(assign_complaint))
        .route("/{id}/rating", post(rate_complaint))
}
