use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use hostelcare_core::{AppError, ErrorResponse, PaginationMeta};
use hostelcare_models::{
    AssignComplaintDto, Complaint, ComplaintFilterParams, ComplaintId, ComplaintStats,
    CreateComplaintDto, HomeStats, MyComplaintsParams, PaginatedComplaintsResponse,
    PublicComplaint, RateComplaintDto, UpdateStatusDto,
};
use tracing::instrument;

use super::service::ComplaintService;
use crate::middleware::auth::{AuthUser, RequireAdmin, RequireComplaintsManage, RequireStudent};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Submit a complaint
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintDto,
    responses(
        (status = 201, description = "Complaint created with its ticket ID", body = Complaint),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 409, description = "Ticket allocation exhausted", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, dto))]
pub async fn create_complaint(
    State(state): State<AppState>,
    RequireStudent(_auth_user, student_id): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateComplaintDto>,
) -> Result<(StatusCode, Json<Complaint>), AppError> {
    let complaint =
        ComplaintService::create_complaint(&state.db, &state.ticket_config, student_id, dto)
            .await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

/// List the caller's own complaints, newest first
#[utoipa::path(
    get,
    path = "/api/complaints/my",
    params(MyComplaintsParams),
    responses(
        (status = 200, description = "The student's complaints", body = PaginatedComplaintsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_my_complaints(
    State(state): State<AppState>,
    RequireStudent(_auth_user, student_id): RequireStudent,
    Query(params): Query<MyComplaintsParams>,
) -> Result<Json<PaginatedComplaintsResponse>, AppError> {
    let (data, total) =
        ComplaintService::list_student_complaints(&state.db, student_id, &params).await?;

    Ok(Json(PaginatedComplaintsResponse {
        data,
        meta: PaginationMeta::new(total, &params.pagination),
    }))
}

/// List all complaints with filters
#[utoipa::path(
    get,
    path = "/api/complaints",
    params(ComplaintFilterParams),
    responses(
        (status = 200, description = "Complaints matching the filters", body = PaginatedComplaintsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_complaints(
    State(state): State<AppState>,
    RequireAdmin(_auth_user, admin_id): RequireAdmin,
    Query(params): Query<ComplaintFilterParams>,
) -> Result<Json<PaginatedComplaintsResponse>, AppError> {
    let (data, total) = ComplaintService::list_complaints(&state.db, admin_id, &params).await?;

    Ok(Json(PaginatedComplaintsResponse {
        data,
        meta: PaginationMeta::new(total, &params.pagination),
    }))
}

/// Get a complaint by ID
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(("id" = ComplaintId, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint details", body = Complaint),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_complaint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ComplaintId>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = ComplaintService::get_complaint(&state.db, id, &auth_user).await?;
    Ok(Json(complaint))
}

/// Change a complaint's status
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    params(("id" = ComplaintId, Path, description = "Complaint ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = Complaint),
        (status = 400, description = "Transition not allowed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires complaints:manage", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse),
        (status = 409, description = "Stale expectedVersion", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, dto))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireComplaintsManage(_auth_user, admin_id): RequireComplaintsManage,
    Path(id): Path<ComplaintId>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = ComplaintService::update_status(&state.db, id, admin_id, dto).await?;
    Ok(Json(complaint))
}

/// Assign a complaint to an admin
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/assign",
    params(("id" = ComplaintId, Path, description = "Complaint ID")),
    request_body = AssignComplaintDto,
    responses(
        (status = 200, description = "Complaint assigned and in progress", body = Complaint),
        (status = 400, description = "Assignee is deactivated", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires complaints:manage", body = ErrorResponse),
        (status = 404, description = "Complaint or admin not found", body = ErrorResponse),
        (status = 409, description = "Stale expectedVersion", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, dto))]
pub async fn assign_complaint(
    State(state): State<AppState>,
    RequireComplaintsManage(_auth_user, admin_id): RequireComplaintsManage,
    Path(id): Path<ComplaintId>,
    ValidatedJson(dto): ValidatedJson<AssignComplaintDto>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = ComplaintService::assign(&state.db, id, admin_id, dto).await?;
    Ok(Json(complaint))
}

/// Rate a resolved complaint
#[utoipa::path(
    post,
    path = "/api/complaints/{id}/rating",
    params(("id" = ComplaintId, Path, description = "Complaint ID")),
    request_body = RateComplaintDto,
    responses(
        (status = 200, description = "Rating saved", body = Complaint),
        (status = 400, description = "Complaint is not resolved", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Complaint not found", body = ErrorResponse),
        (status = 422, description = "Rating out of range", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state, dto))]
pub async fn rate_complaint(
    State(state): State<AppState>,
    RequireStudent(_auth_user, student_id): RequireStudent,
    Path(id): Path<ComplaintId>,
    ValidatedJson(dto): ValidatedJson<RateComplaintDto>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = ComplaintService::rate(&state.db, id, student_id, dto).await?;
    Ok(Json(complaint))
}

/// Complaint statistics
#[utoipa::path(
    get,
    path = "/api/complaints/stats/overview",
    responses(
        (status = 200, description = "Aggregate statistics", body = ComplaintStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<ComplaintStats>, AppError> {
    let stats = ComplaintService::stats(&state.db).await?;
    Ok(Json(stats))
}

/// Landing page figures
#[utoipa::path(
    get,
    path = "/api/complaints/stats/home/overview",
    responses(
        (status = 200, description = "Totals, resolution rate and mean days to resolve", body = HomeStats)
    ),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_home_stats(State(state): State<AppState>) -> Result<Json<HomeStats>, AppError> {
    let stats = ComplaintService::home_stats(&state.db).await?;
    Ok(Json(stats))
}

/// Recent complaints, reduced to public fields
#[utoipa::path(
    get,
    path = "/api/complaints/recent/public",
    responses(
        (status = 200, description = "Most recent complaints", body = Vec<PublicComplaint>)
    ),
    tag = "Complaints"
)]
#[instrument(skip(state))]
pub async fn get_recent_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicComplaint>>, AppError> {
    let complaints = ComplaintService::recent_public(&state.db).await?;
    Ok(Json(complaints))
}
