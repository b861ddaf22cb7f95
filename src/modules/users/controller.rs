use axum::{Json, extract::State};
use hostelcare_core::{AppError, ErrorResponse};
use hostelcare_models::{
    ChangePasswordDto, DeleteAccountDto, MessageResponse, StudentComplaintSummary,
};
use tracing::instrument;

use super::service::UserService;
use crate::middleware::auth::RequireStudent;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// The caller's complaint counts and five newest complaints
#[utoipa::path(
    get,
    path = "/api/user/dashboard",
    responses(
        (status = 200, description = "Dashboard figures", body = StudentComplaintSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_student_dashboard(
    State(state): State<AppState>,
    RequireStudent(_auth_user, student_id): RequireStudent,
) -> Result<Json<StudentComplaintSummary>, AppError> {
    let summary = UserService::dashboard(&state.db, student_id).await?;
    Ok(Json(summary))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/user/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireStudent(_auth_user, student_id): RequireStudent,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_password(&state.db, student_id, dto).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Delete the caller's account and all of their complaints
#[utoipa::path(
    delete,
    path = "/api/user/delete",
    request_body = DeleteAccountDto,
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 400, description = "Password is incorrect", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn delete_account(
    State(state): State<AppState>,
    RequireStudent(_auth_user, student_id): RequireStudent,
    ValidatedJson(dto): ValidatedJson<DeleteAccountDto>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_account(&state.db, student_id, dto).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}
