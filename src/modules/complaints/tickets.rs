//! Ticket id allocation.
//!
//! The allocator and the complaint insert are one unit: a complaint row
//! never exists without its ticket, and a failed insert never leaves a
//! ticket half-issued.
//!
//! - [`TicketStrategy::Counter`]: reserves the next number from the
//!   per-prefix row in `ticket_counters` inside the insert's transaction.
//!   The counter row lock orders concurrent creators, so nothing retries.
//! - [`TicketStrategy::Probe`]: guesses `count + 1 + attempt`, skips
//!   numbers that are taken, and treats a unique violation on the ticket
//!   column as a lost race. Gives up with 409 after `max_attempts`.

use anyhow::anyhow;
use hostelcare_config::{TicketConfig, TicketStrategy};
use hostelcare_core::AppError;
use hostelcare_db::tickets::{complaint_count, reserve_sequences, ticket_exists};
use hostelcare_db::{
    COMPLAINT_STUDENT_FK, PgPool, TICKET_ID_CONSTRAINT, foreign_key_violation, unique_violation,
};
use hostelcare_models::{ComplaintRow, NewComplaint, TicketId};
use sqlx::PgConnection;
use sqlx::types::Json;
use tracing::instrument;

use crate::metrics::{track_ticket_allocated, track_ticket_allocation_exhausted};

/// Inserts `complaint` under a freshly allocated ticket id.
pub async fn create_with_ticket(
    db: &PgPool,
    config: &TicketConfig,
    complaint: &NewComplaint,
) -> Result<ComplaintRow, AppError> {
    match config.strategy {
        TicketStrategy::Counter => create_with_counter(db, config, complaint).await,
        TicketStrategy::Probe => create_with_probe(db, config, complaint).await,
    }
}

#[instrument(skip(db, config, complaint))]
async fn create_with_counter(
    db: &PgPool,
    config: &TicketConfig,
    complaint: &NewComplaint,
) -> Result<ComplaintRow, AppError> {
    let mut tx = db.begin().await?;

    let sequence = reserve_sequences(&mut tx, &config.prefix, 1).await?;
    let ticket_id = ticket_for(config, sequence)?;

    let row = insert_complaint(&mut tx, &ticket_id, complaint)
        .await
        .map_err(|e| match unique_violation(&e) {
            // Another writer bypassed the counter and won the race. The next
            // reservation starts past that ticket.
            Some(TICKET_ID_CONSTRAINT) => AppError::conflict(anyhow!(
                "Ticket ID {} is already taken, please retry",
                ticket_id
            )),
            _ => insert_error(e),
        })?;

    tx.commit().await?;

    track_ticket_allocated("counter", 1);
    tracing::debug!(ticket_id = %row.ticket_id, "Ticket allocated");
    Ok(row)
}

#[instrument(skip(db, config, complaint))]
async fn create_with_probe(
    db: &PgPool,
    config: &TicketConfig,
    complaint: &NewComplaint,
) -> Result<ComplaintRow, AppError> {
    let mut conn = db.acquire().await?;

    for attempt in 0..config.max_attempts {
        let count = complaint_count(&mut conn).await?;
        let ticket_id = ticket_for(config, count + 1 + i64::from(attempt))?;

        if ticket_exists(&mut conn, ticket_id.as_str()).await? {
            continue;
        }

        match insert_complaint(&mut conn, &ticket_id, complaint).await {
            Ok(row) => {
                track_ticket_allocated("probe", attempt + 1);
                return Ok(row);
            }
            Err(e) if unique_violation(&e) == Some(TICKET_ID_CONSTRAINT) => {
                tracing::debug!(%ticket_id, attempt, "Ticket collision, retrying");
            }
            Err(e) => return Err(insert_error(e)),
        }
    }

    track_ticket_allocation_exhausted();
    tracing::warn!(
        max_attempts = config.max_attempts,
        "Ticket allocation exhausted"
    );
    Err(AppError::conflict(anyhow!(
        "Could not allocate a unique ticket ID after {} attempts, please retry",
        config.max_attempts
    )))
}

/// The filing student vanished between token check and insert.
fn insert_error(e: sqlx::Error) -> AppError {
    match foreign_key_violation(&e) {
        Some(COMPLAINT_STUDENT_FK) => AppError::unauthorized("Token is not valid"),
        _ => AppError::database(e),
    }
}

fn ticket_for(config: &TicketConfig, sequence: i64) -> Result<TicketId, AppError> {
    let sequence = u64::try_from(sequence)
        .map_err(|_| AppError::internal_error(format!("Invalid ticket sequence {sequence}")))?;
    Ok(TicketId::format(&config.prefix, config.width, sequence))
}

async fn insert_complaint(
    conn: &mut PgConnection,
    ticket_id: &TicketId,
    complaint: &NewComplaint,
) -> Result<ComplaintRow, sqlx::Error> {
    sqlx::query_as::<_, ComplaintRow>(&format!(
        "INSERT INTO complaints
             (ticket_id, student_id, category, title, description, location,
              priority, urgency, images)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {}",
        ComplaintRow::COLUMNS
    ))
    .bind(ticket_id)
    .bind(complaint.student)
    .bind(complaint.category)
    .bind(&complaint.title)
    .bind(&complaint.description)
    .bind(&complaint.location)
    .bind(complaint.priority)
    .bind(complaint.urgency)
    .bind(Json(&complaint.images))
    .fetch_one(&mut *conn)
    .await
}
