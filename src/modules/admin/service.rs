use anyhow::anyhow;
use hostelcare_core::{AppError, hash_password};
use hostelcare_db::unique_violation;
use hostelcare_models::admins::DEFAULT_DEPARTMENT;
use hostelcare_models::{
    Admin, AdminDashboard, AdminId, CreateAdminDto, Email, PhoneNumber, RecentComplaint, Student,
    StudentDetailsResponse, StudentId, StudentQueryParams, StudentSummary,
    UpdateAdminPermissionsDto,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::complaints::service::ComplaintService;

/// Number of complaints embedded in a student's detail view.
const RECENT_COMPLAINTS: i64 = 10;

/// Number of complaints and students on the admin dashboard.
const DASHBOARD_RECENT: i64 = 5;

#[derive(sqlx::FromRow)]
struct DashboardTotals {
    total_students: i64,
    total_complaints: i64,
    pending_complaints: i64,
    resolved_complaints: i64,
}

/// `%term%` for ILIKE, with the pattern metacharacters escaped.
fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(db))]
    pub async fn overview(db: &PgPool) -> Result<AdminDashboard, AppError> {
        let totals = sqlx::query_as::<_, DashboardTotals>(
            "SELECT
                 (SELECT COUNT(*) FROM students) AS total_students,
                 COUNT(*) AS total_complaints,
                 COUNT(*) FILTER (WHERE status = 'pending') AS pending_complaints,
                 COUNT(*) FILTER (WHERE status = 'resolved') AS resolved_complaints
             FROM complaints",
        )
        .fetch_one(db)
        .await?;

        let recent_complaints = sqlx::query_as::<_, RecentComplaint>(
            "SELECT c.id, c.ticket_id, c.title, c.status, c.created_at,
                    s.name AS student_name, s.student_id AS student_number
             FROM complaints c
             JOIN students s ON s.id = c.student_id
             ORDER BY c.created_at DESC, c.id
             LIMIT $1",
        )
        .bind(DASHBOARD_RECENT)
        .fetch_all(db)
        .await?;

        let recent_students = sqlx::query_as::<_, StudentSummary>(
            "SELECT id, student_id, name, email, created_at
             FROM students
             ORDER BY created_at DESC, id
             LIMIT $1",
        )
        .bind(DASHBOARD_RECENT)
        .fetch_all(db)
        .await?;

        Ok(AdminDashboard {
            total_students: totals.total_students,
            total_complaints: totals.total_complaints,
            pending_complaints: totals.pending_complaints,
            resolved_complaints: totals.resolved_complaints,
            recent_complaints,
            recent_students,
        })
    }
}

pub struct StudentAdminService;

impl StudentAdminService {
    #[instrument(skip(db, params))]
    pub async fn list_students(
        db: &PgPool,
        params: &StudentQueryParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let pattern = search_pattern(params.search.as_deref());
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        const FILTER: &str = "($1::text IS NULL
                OR name ILIKE $1
                OR student_id ILIKE $1
                OR email ILIKE $1)";

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students
             WHERE {FILTER}
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3",
            Student::COLUMNS
        ))
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM students WHERE {FILTER}"))
            .bind(&pattern)
            .fetch_one(db)
            .await?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student_details(
        db: &PgPool,
        id: StudentId,
    ) -> Result<StudentDetailsResponse, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            Student::COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        let complaints = ComplaintService::student_summary(db, id, RECENT_COMPLAINTS).await?;

        Ok(StudentDetailsResponse { student, complaints })
    }

    /// Deletes the student; their complaints go with them.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        tracing::info!(student = %id, "Student deleted with their complaints");
        Ok(())
    }
}

pub struct AdminAccountService;

impl AdminAccountService {
    #[instrument(skip(db, dto), fields(admin_id = %dto.admin_id))]
    pub async fn create_admin(db: &PgPool, dto: CreateAdminDto) -> Result<Admin, AppError> {
        let email = Email::new(&dto.email).map_err(AppError::unprocessable)?;
        let phone = dto
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()
            .map_err(AppError::unprocessable)?;
        let hashed_password = hash_password(&dto.password)?;

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (admin_id, name, email, department, phone, password,
                                 can_manage_complaints, can_manage_users, can_manage_admins)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            Admin::COLUMNS
        ))
        .bind(dto.admin_id.trim().to_uppercase())
        .bind(dto.name.trim())
        .bind(&email)
        .bind(
            dto.department
                .as_deref()
                .map(str::trim)
                .unwrap_or(DEFAULT_DEPARTMENT),
        )
        .bind(&phone)
        .bind(&hashed_password)
        .bind(dto.can_manage_complaints.unwrap_or(true))
        .bind(dto.can_manage_users.unwrap_or(false))
        .bind(dto.can_manage_admins.unwrap_or(false))
        .fetch_one(db)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some("admins_admin_id_key") => AppError::conflict(anyhow!("Admin ID already exists")),
            Some("admins_email_key") => AppError::conflict(anyhow!("Email is already registered")),
            Some(_) => AppError::conflict(anyhow!("Admin already exists")),
            None => AppError::database(e),
        })?;

        tracing::info!(id = %admin.id, "Admin created");
        Ok(admin)
    }

    #[instrument(skip(db))]
    pub async fn list_admins(db: &PgPool) -> Result<Vec<Admin>, AppError> {
        let admins = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins ORDER BY created_at, admin_id",
            Admin::COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Ok(admins)
    }

    /// Applies the flags that are present. Takes effect at the admin's next login.
    #[instrument(skip(db))]
    pub async fn update_permissions(
        db: &PgPool,
        id: AdminId,
        dto: UpdateAdminPermissionsDto,
    ) -> Result<Admin, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow!("No permissions to update")));
        }

        sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins
             SET can_manage_complaints = COALESCE($2, can_manage_complaints),
                 can_manage_users = COALESCE($3, can_manage_users),
                 can_manage_admins = COALESCE($4, can_manage_admins),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            Admin::COLUMNS
        ))
        .bind(id)
        .bind(dto.can_manage_complaints)
        .bind(dto.can_manage_users)
        .bind(dto.can_manage_admins)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Admin not found")))
    }

    /// Flips `is_active`. An admin cannot deactivate their own account.
    #[instrument(skip(db))]
    pub async fn toggle_status(db: &PgPool, id: AdminId, actor: AdminId) -> Result<Admin, AppError> {
        if id == actor {
            return Err(AppError::bad_request(anyhow!(
                "You cannot change the status of your own account"
            )));
        }

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins
             SET is_active = NOT is_active, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            Admin::COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Admin not found")))?;

        tracing::info!(admin = %admin.id, is_active = admin.is_active, %actor, "Admin status toggled");
        Ok(admin)
    }
}
