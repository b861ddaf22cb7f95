use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use hostelcare_core::{AppError, ErrorResponse, PaginationMeta};
use hostelcare_models::{
    Admin, AdminDashboard, AdminId, CreateAdminDto, MessageResponse, PaginatedStudentsResponse,
    StudentDetailsResponse, StudentId, StudentQueryParams, UpdateAdminPermissionsDto,
};
use tracing::instrument;

use super::service::{AdminAccountService, DashboardService, StudentAdminService};
use crate::middleware::auth::{RequireAdmin, RequireAdminsManage, RequireUsersManage};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Dashboard overview for any admin
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/overview",
    responses(
        (status = 200, description = "Totals with the newest complaints and students", body = AdminDashboard),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_admin_dashboard(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<AdminDashboard>, AppError> {
    let dashboard = DashboardService::overview(&state.db).await?;
    Ok(Json(dashboard))
}

/// List students
#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Students matching the search", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing users:manage", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    _guard: RequireUsersManage,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (data, total) = StudentAdminService::list_students(&state.db, &params).await?;

    Ok(Json(PaginatedStudentsResponse {
        data,
        meta: PaginationMeta::new(total, &params.pagination),
    }))
}

/// Get a student with their complaint summary
#[utoipa::path(
    get,
    path = "/api/admin/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentDetailsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing users:manage", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    _guard: RequireUsersManage,
    Path(id): Path<StudentId>,
) -> Result<Json<StudentDetailsResponse>, AppError> {
    let details = StudentAdminService::get_student_details(&state.db, id).await?;
    Ok(Json(details))
}

/// Delete a student and all of their complaints
#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(("id" = StudentId, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing users:manage", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    _guard: RequireUsersManage,
    Path(id): Path<StudentId>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentAdminService::delete_student(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// Create an admin account
#[utoipa::path(
    post,
    path = "/api/admin/admins",
    request_body = CreateAdminDto,
    responses(
        (status = 201, description = "Admin created", body = Admin),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse),
        (status = 409, description = "Admin ID or email already in use", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn create_admin(
    State(state): State<AppState>,
    _guard: RequireAdminsManage,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<(StatusCode, Json<Admin>), AppError> {
    let admin = AdminAccountService::create_admin(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

/// List admin accounts
#[utoipa::path(
    get,
    path = "/api/admin/admins",
    responses(
        (status = 200, description = "All admins", body = Vec<Admin>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_admins(
    State(state): State<AppState>,
    _guard: RequireAdminsManage,
) -> Result<Json<Vec<Admin>>, AppError> {
    let admins = AdminAccountService::list_admins(&state.db).await?;
    Ok(Json(admins))
}

/// Change an admin's permission flags
#[utoipa::path(
    put,
    path = "/api/admin/admins/{id}/permissions",
    params(("id" = AdminId, Path, description = "Admin ID")),
    request_body = UpdateAdminPermissionsDto,
    responses(
        (status = 200, description = "Permissions updated", body = Admin),
        (status = 400, description = "No permissions supplied", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state, dto))]
pub async fn update_admin_permissions(
    State(state): State<AppState>,
    _guard: RequireAdminsManage,
    Path(id): Path<AdminId>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminPermissionsDto>,
) -> Result<Json<Admin>, AppError> {
    let admin = AdminAccountService::update_permissions(&state.db, id, dto).await?;
    Ok(Json(admin))
}

/// Activate or deactivate an admin
#[utoipa::path(
    patch,
    path = "/api/admin/admins/{id}/toggle-status",
    params(("id" = AdminId, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Status flipped", body = Admin),
        (status = 400, description = "Cannot toggle own account", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn toggle_admin_status(
    State(state): State<AppState>,
    RequireAdminsManage(_auth_user, actor): RequireAdminsManage,
    Path(id): Path<AdminId>,
) -> Result<Json<Admin>, AppError> {
    let admin = AdminAccountService::toggle_status(&state.db, id, actor).await?;
    Ok(Json(admin))
}
