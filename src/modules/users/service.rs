use anyhow::anyhow;
use hostelcare_core::{AppError, hash_password, verify_password};
use hostelcare_models::{ChangePasswordDto, DeleteAccountDto, StudentComplaintSummary, StudentId};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::complaints::service::ComplaintService;

/// Complaints shown on a student's own dashboard.
const DASHBOARD_RECENT: i64 = 5;

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn dashboard(
        db: &PgPool,
        student: StudentId,
    ) -> Result<StudentComplaintSummary, AppError> {
        ComplaintService::student_summary(db, student, DASHBOARD_RECENT).await
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        student: StudentId,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        confirm_password(db, student, &dto.current_password, "Current password is incorrect")
            .await?;

        let hashed_password = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE students SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(student)
            .bind(&hashed_password)
            .execute(db)
            .await?;

        tracing::info!(%student, "Password changed");
        Ok(())
    }

    /// Removes the caller's account; their complaints go with it.
    #[instrument(skip(db, dto))]
    pub async fn delete_account(
        db: &PgPool,
        student: StudentId,
        dto: DeleteAccountDto,
    ) -> Result<(), AppError> {
        confirm_password(db, student, &dto.password, "Password is incorrect").await?;

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student)
            .execute(db)
            .await?;

        tracing::info!(%student, "Student deleted their account");
        Ok(())
    }
}

async fn confirm_password(
    db: &PgPool,
    student: StudentId,
    password: &str,
    mismatch: &'static str,
) -> Result<(), AppError> {
    let hash: String = sqlx::query_scalar("SELECT password FROM students WHERE id = $1")
        .bind(student)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

    if !verify_password(password, &hash)? {
        return Err(AppError::bad_request(anyhow!(mismatch)));
    }
    Ok(())
}
