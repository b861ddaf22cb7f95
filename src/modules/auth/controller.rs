use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use hostelcare_core::{AppError, ErrorResponse};
use hostelcare_models::{
    AdminAuthResponse, AdminLoginRequest, CurrentUser, RegisterStudentDto, StudentAuthResponse,
    StudentLoginRequest,
};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a student account
#[utoipa::path(
    post,
    path = "/api/auth/student/register",
    request_body = RegisterStudentDto,
    responses(
        (status = 201, description = "Student registered", body = StudentAuthResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Student ID, email or mobile already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterStudentDto>,
) -> Result<(StatusCode, Json<StudentAuthResponse>), AppError> {
    let response = AuthService::register_student(&state.db, dto, &state.jwt_config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Student login
#[utoipa::path(
    post,
    path = "/api/auth/student/login",
    request_body = StudentLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = StudentAuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<StudentLoginRequest>,
) -> Result<Json<StudentAuthResponse>, AppError> {
    let response = AuthService::login_student(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Admin login
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminAuthResponse),
        (status = 401, description = "Invalid credentials or deactivated account", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AdminLoginRequest>,
) -> Result<Json<AdminAuthResponse>, AppError> {
    let response = AuthService::login_admin(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// The account behind the bearer token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current student or admin", body = CurrentUser),
        (status = 401, description = "Missing, invalid or orphaned token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<CurrentUser>, AppError> {
    let user = AuthService::current_user(&state.db, &auth_user).await?;
    Ok(Json(user))
}
