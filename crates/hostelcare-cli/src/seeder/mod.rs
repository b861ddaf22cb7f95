//! Development data seeding.
//!
//! Seeded students use `@example.com` addresses, which is how
//! [`clear_seeded_data`] finds them again. Their complaints go with them
//! through the foreign key cascade.

mod complaints;
mod models;
mod students;

use std::time::Instant;

use hostelcare_config::TicketConfig;
use hostelcare_db::PgPool;
use hostelcare_models::AdminId;

pub use complaints::{generate_complaints, insert_complaints};
pub use models::{ComplaintSeed, SeedConfig, SeedSummary, StudentSeed};
pub use students::{generate_students, insert_students};

use crate::CliResult;

pub const SEED_EMAIL_DOMAIN: &str = "example.com";

pub async fn seed_all(
    db: &PgPool,
    tickets: &TicketConfig,
    config: SeedConfig,
) -> CliResult<SeedSummary> {
    let start = Instant::now();

    println!("🌱 Seeding {} students...", config.students);
    let seeds = generate_students(config.students, &config.password)?;
    let student_ids = insert_students(db, &seeds).await?;
    println!("   ✅ {} students ({:.2?})", student_ids.len(), start.elapsed());

    let handler: Option<AdminId> = sqlx::query_scalar(
        "SELECT id FROM admins
         WHERE is_active AND can_manage_complaints
         ORDER BY created_at
         LIMIT 1",
    )
    .fetch_optional(db)
    .await?;

    if handler.is_none() && config.complaints_per_student > 0 {
        println!("   ℹ️  No active admin found, all seeded complaints stay pending");
    }

    let complaint_start = Instant::now();
    let complaint_seeds = generate_complaints(&student_ids, config.complaints_per_student, handler);
    let complaints = insert_complaints(db, tickets, &complaint_seeds).await?;
    println!(
        "   ✅ {} complaints ({:.2?})",
        complaints,
        complaint_start.elapsed()
    );

    Ok(SeedSummary {
        students: student_ids.len(),
        complaints,
        elapsed: start.elapsed(),
    })
}

/// Deletes seeded students and, through the cascade, their complaints.
pub async fn clear_seeded_data(db: &PgPool) -> CliResult<u64> {
    let start = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let result = sqlx::query("DELETE FROM students WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?;

    println!(
        "   ✅ Deleted {} students and their complaints ({:.2?})",
        result.rows_affected(),
        start.elapsed()
    );

    Ok(result.rows_affected())
}
