use anyhow::anyhow;
use chrono::Utc;
use hostelcare_config::TicketConfig;
use hostelcare_core::AppError;
use hostelcare_models::complaints::round_one_decimal;
use hostelcare_models::lifecycle;
use hostelcare_models::{
    AdminId, AssignComplaintDto, AssignedFilter, CategoryCount, Complaint, ComplaintFilterParams,
    ComplaintId, ComplaintRow, ComplaintStats, CreateComplaintDto, HomeStats, MyComplaintsParams,
    NewComplaint, PublicComplaint, RateComplaintDto, StudentComplaintSummary, StudentId,
    UpdateStatusDto,
};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use super::tickets::create_with_ticket;
use crate::metrics::{
    track_complaint_assigned, track_complaint_created, track_complaint_rated,
    track_status_transition,
};
use crate::middleware::auth::AuthUser;

/// Size of the unauthenticated recent-activity feed.
pub const PUBLIC_RECENT_LIMIT: i64 = 14;

#[derive(sqlx::FromRow)]
struct StudentCounts {
    total: i64,
    pending: i64,
    in_progress: i64,
    resolved: i64,
    rejected: i64,
}

#[derive(sqlx::FromRow)]
struct StatusTotals {
    total: i64,
    pending: i64,
    in_progress: i64,
    resolved: i64,
    rejected: i64,
    resolved_last_7_days: i64,
    avg_resolution_days: Option<f64>,
}

pub struct ComplaintService;

impl ComplaintService {
    #[instrument(skip(db, tickets, dto), fields(category = %dto.category))]
    pub async fn create_complaint(
        db: &PgPool,
        tickets: &TicketConfig,
        student: StudentId,
        dto: CreateComplaintDto,
    ) -> Result<Complaint, AppError> {
        let new = NewComplaint::from_dto(student, dto);
        let row = create_with_ticket(db, tickets, &new).await?;

        track_complaint_created(row.category);
        tracing::info!(ticket_id = %row.ticket_id, %student, "Complaint created");

        Ok(row.into())
    }

    #[instrument(skip(db, auth_user))]
    pub async fn get_complaint(
        db: &PgPool,
        id: ComplaintId,
        auth_user: &AuthUser,
    ) -> Result<Complaint, AppError> {
        let complaint: Complaint = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {} FROM complaints WHERE id = $1",
            ComplaintRow::COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Complaint not found")))?
        .into();

        if auth_user.is_student() && complaint.student != auth_user.student_id()? {
            return Err(AppError::forbidden("You can only view your own complaints"));
        }

        Ok(complaint)
    }

    #[instrument(skip(db, params))]
    pub async fn list_student_complaints(
        db: &PgPool,
        student: StudentId,
        params: &MyComplaintsParams,
    ) -> Result<(Vec<Complaint>, i64), AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {} FROM complaints
             WHERE student_id = $1
               AND ($2::complaint_status IS NULL OR status = $2)
             ORDER BY created_at DESC, id
             LIMIT $3 OFFSET $4",
            ComplaintRow::COLUMNS
        ))
        .bind(student)
        .bind(params.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM complaints
             WHERE student_id = $1
               AND ($2::complaint_status IS NULL OR status = $2)",
        )
        .bind(student)
        .bind(params.status)
        .fetch_one(db)
        .await?;

        Ok((rows.into_iter().map(Complaint::from).collect(), total))
    }

    /// Lists every complaint; `assigned=me` resolves against `admin`.
    #[instrument(skip(db, params))]
    pub async fn list_complaints(
        db: &PgPool,
        admin: AdminId,
        params: &ComplaintFilterParams,
    ) -> Result<(Vec<Complaint>, i64), AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();
        let assigned_to = matches!(params.assigned, Some(AssignedFilter::Me)).then_some(admin);
        let unassigned = matches!(params.assigned, Some(AssignedFilter::Unassigned));

        const FILTER: &str = "($1::complaint_status IS NULL OR status = $1)
               AND ($2::complaint_category IS NULL OR category = $2)
               AND ($3::uuid IS NULL OR assigned_to = $3)
               AND (NOT $4 OR assigned_to IS NULL)";

        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {} FROM complaints
             WHERE {FILTER}
             ORDER BY created_at DESC, id
             LIMIT $5 OFFSET $6",
            ComplaintRow::COLUMNS
        ))
        .bind(params.status)
        .bind(params.category)
        .bind(assigned_to)
        .bind(unassigned)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM complaints WHERE {FILTER}"))
            .bind(params.status)
            .bind(params.category)
            .bind(assigned_to)
            .bind(unassigned)
            .fetch_one(db)
            .await?;

        Ok((rows.into_iter().map(Complaint::from).collect(), total))
    }

    #[instrument(skip(db, dto), fields(status = %dto.status))]
    pub async fn update_status(
        db: &PgPool,
        id: ComplaintId,
        actor: AdminId,
        dto: UpdateStatusDto,
    ) -> Result<Complaint, AppError> {
        let mut tx = db.begin().await?;
        let mut complaint = lock_complaint(&mut tx, id).await?;

        lifecycle::check_version(&complaint, dto.expected_version)
            .map_err(|e| e.into_app_error())?;
        let transition = lifecycle::update_status(
            &mut complaint,
            dto.status,
            actor,
            trimmed(dto.notes),
            trimmed(dto.solution),
            Utc::now(),
        )
        .map_err(|e| e.into_app_error())?;

        let complaint = persist(&mut tx, &complaint).await?;
        tx.commit().await?;

        track_status_transition(transition.from, transition.to);
        tracing::info!(
            ticket_id = %complaint.ticket_id,
            from = %transition.from,
            to = %transition.to,
            %actor,
            "Complaint status updated"
        );

        Ok(complaint)
    }

    #[instrument(skip(db, dto), fields(assignee = %dto.admin_id))]
    pub async fn assign(
        db: &PgPool,
        id: ComplaintId,
        actor: AdminId,
        dto: AssignComplaintDto,
    ) -> Result<Complaint, AppError> {
        let mut tx = db.begin().await?;

        let assignee_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM admins WHERE id = $1")
                .bind(dto.admin_id)
                .fetch_optional(&mut *tx)
                .await?;
        match assignee_active {
            None => return Err(AppError::not_found(anyhow!("Admin not found"))),
            Some(false) => {
                return Err(AppError::bad_request(anyhow!(
                    "Cannot assign a complaint to a deactivated admin"
                )));
            }
            Some(true) => {}
        }

        let mut complaint = lock_complaint(&mut tx, id).await?;
        lifecycle::check_version(&complaint, dto.expected_version)
            .map_err(|e| e.into_app_error())?;
        let transition = lifecycle::assign(&mut complaint, dto.admin_id);

        let complaint = persist(&mut tx, &complaint).await?;
        tx.commit().await?;

        track_complaint_assigned();
        track_status_transition(transition.from, transition.to);
        tracing::info!(
            ticket_id = %complaint.ticket_id,
            assignee = %dto.admin_id,
            %actor,
            "Complaint assigned"
        );

        Ok(complaint)
    }

    #[instrument(skip(db, dto))]
    pub async fn rate(
        db: &PgPool,
        id: ComplaintId,
        student: StudentId,
        dto: RateComplaintDto,
    ) -> Result<Complaint, AppError> {
        let mut tx = db.begin().await?;
        let mut complaint = lock_complaint(&mut tx, id).await?;

        lifecycle::rate(
            &mut complaint,
            student,
            dto.rating,
            trimmed(dto.feedback),
            Utc::now(),
        )
        .map_err(|e| e.into_app_error())?;

        let complaint = persist(&mut tx, &complaint).await?;
        tx.commit().await?;

        track_complaint_rated(dto.rating);
        Ok(complaint)
    }

    /// Status counts for one student plus their `recent` newest complaints.
    #[instrument(skip(db))]
    pub async fn student_summary(
        db: &PgPool,
        student: StudentId,
        recent: i64,
    ) -> Result<StudentComplaintSummary, AppError> {
        let counts = sqlx::query_as::<_, StudentCounts>(
            "SELECT
                 COUNT(*) AS total,
                 COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                 COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
                 COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
                 COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
             FROM complaints
             WHERE student_id = $1",
        )
        .bind(student)
        .fetch_one(db)
        .await?;

        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {} FROM complaints
             WHERE student_id = $1
             ORDER BY created_at DESC, id
             LIMIT $2",
            ComplaintRow::COLUMNS
        ))
        .bind(student)
        .bind(recent)
        .fetch_all(db)
        .await?;

        Ok(StudentComplaintSummary {
            total: counts.total,
            pending: counts.pending,
            in_progress: counts.in_progress,
            resolved: counts.resolved,
            rejected: counts.rejected,
            recent: rows.into_iter().map(Complaint::from).collect(),
        })
    }

    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool) -> Result<ComplaintStats, AppError> {
        let totals = status_totals(db).await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count
             FROM complaints
             GROUP BY category
             ORDER BY count DESC, category",
        )
        .fetch_all(db)
        .await?;

        let resolution_rate = if totals.total > 0 {
            round_one_decimal(totals.resolved as f64 * 100.0 / totals.total as f64)
        } else {
            0.0
        };

        Ok(ComplaintStats {
            total: totals.total,
            pending: totals.pending,
            in_progress: totals.in_progress,
            resolved: totals.resolved,
            rejected: totals.rejected,
            resolution_rate,
            resolved_last_7_days: totals.resolved_last_7_days,
            avg_resolution_days: totals.avg_resolution_days.map(round_one_decimal),
            by_category,
        })
    }

    #[instrument(skip(db))]
    pub async fn home_stats(db: &PgPool) -> Result<HomeStats, AppError> {
        let totals = status_totals(db).await?;

        let resolution_rate = if totals.total > 0 {
            (totals.resolved as f64 * 100.0 / totals.total as f64).round() as i64
        } else {
            0
        };

        Ok(HomeStats {
            total: totals.total,
            resolved: totals.resolved,
            pending: totals.pending,
            in_progress: totals.in_progress,
            resolution_rate,
            avg_days_to_resolve: totals.avg_resolution_days.map_or(0.0, round_one_decimal),
        })
    }

    #[instrument(skip(db))]
    pub async fn recent_public(db: &PgPool) -> Result<Vec<PublicComplaint>, AppError> {
        let complaints = sqlx::query_as::<_, PublicComplaint>(
            "SELECT title, category, status, created_at
             FROM complaints
             ORDER BY created_at DESC, id
             LIMIT $1",
        )
        .bind(PUBLIC_RECENT_LIMIT)
        .fetch_all(db)
        .await?;

        Ok(complaints)
    }
}

async fn status_totals(db: &PgPool) -> Result<StatusTotals, AppError> {
    let totals = sqlx::query_as::<_, StatusTotals>(
        "SELECT
             COUNT(*) AS total,
             COUNT(*) FILTER (WHERE status = 'pending') AS pending,
             COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
             COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
             COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
             COUNT(*) FILTER (
                 WHERE status = 'resolved' AND resolved_at >= NOW() - INTERVAL '7 days'
             ) AS resolved_last_7_days,
             (AVG(EXTRACT(EPOCH FROM (resolved_at - created_at)) / 86400.0)
                 FILTER (WHERE status = 'resolved' AND resolved_at IS NOT NULL))::FLOAT8
                 AS avg_resolution_days
         FROM complaints",
    )
    .fetch_one(db)
    .await?;

    Ok(totals)
}

/// Loads the complaint and holds its row lock until the transaction ends.
async fn lock_complaint(conn: &mut PgConnection, id: ComplaintId) -> Result<Complaint, AppError> {
    sqlx::query_as::<_, ComplaintRow>(&format!(
        "SELECT {} FROM complaints WHERE id = $1 FOR UPDATE",
        ComplaintRow::COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .map(Complaint::from)
    .ok_or_else(|| AppError::not_found(anyhow!("Complaint not found")))
}

/// Writes back the mutable lifecycle fields and bumps the version.
async fn persist(conn: &mut PgConnection, complaint: &Complaint) -> Result<Complaint, AppError> {
    let resolution = complaint.resolution_details.as_ref();
    let rating = complaint.rating.as_ref();

    let row = sqlx::query_as::<_, ComplaintRow>(&format!(
        "UPDATE complaints
         SET status = $2,
             assigned_to = $3,
             resolved_by = $4,
             resolved_at = $5,
             resolution_notes = $6,
             resolution_solution = $7,
             rating_score = $8,
             rating_feedback = $9,
             rated_at = $10,
             version = version + 1,
             updated_at = NOW()
         WHERE id = $1
         RETURNING {}",
        ComplaintRow::COLUMNS
    ))
    .bind(complaint.id)
    .bind(complaint.status)
    .bind(complaint.assigned_to)
    .bind(resolution.map(|r| r.resolved_by))
    .bind(resolution.map(|r| r.resolved_at))
    .bind(resolution.and_then(|r| r.notes.clone()))
    .bind(resolution.and_then(|r| r.solution.clone()))
    .bind(rating.map(|r| r.score))
    .bind(rating.and_then(|r| r.feedback.clone()))
    .bind(rating.map(|r| r.rated_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
