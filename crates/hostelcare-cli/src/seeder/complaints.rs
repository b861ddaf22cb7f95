use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use hostelcare_config::TicketConfig;
use hostelcare_db::PgPool;
use hostelcare_db::tickets::reserve_sequences;
use hostelcare_models::{
    AdminId, ComplaintCategory, ComplaintPriority, ComplaintStatus, ComplaintUrgency, StudentId,
    TicketId,
};
use rayon::prelude::*;

use super::models::ComplaintSeed;
use crate::CliResult;

const BATCH_SIZE: usize = 500;
const PRIORITIES: [ComplaintPriority; 3] = [
    ComplaintPriority::Low,
    ComplaintPriority::Medium,
    ComplaintPriority::High,
];
const URGENCIES: [ComplaintUrgency; 3] = [
    ComplaintUrgency::Minor,
    ComplaintUrgency::Moderate,
    ComplaintUrgency::Critical,
];

/// Generates complaints spread over the last 60 days.
///
/// Without a `handler` every complaint is pending; with one, roughly half are
/// assigned and a quarter resolved by that admin.
pub fn generate_complaints(
    students: &[StudentId],
    per_student: usize,
    handler: Option<AdminId>,
) -> Vec<ComplaintSeed> {
    students
        .par_iter()
        .flat_map_iter(|student| (0..per_student).map(move |_| *student))
        .map(|student| {
            let category = ComplaintCategory::ALL[(0..ComplaintCategory::ALL.len()).fake::<usize>()];
            let created_at = Utc::now() - Duration::hours((1..24 * 60).fake::<i64>());

            let status = match handler {
                Some(_) => match (0..4).fake::<u8>() {
                    0 => ComplaintStatus::InProgress,
                    1 => ComplaintStatus::Resolved,
                    _ => ComplaintStatus::Pending,
                },
                None => ComplaintStatus::Pending,
            };

            let resolved_at = (status == ComplaintStatus::Resolved)
                .then(|| created_at + Duration::hours((1..72).fake::<i64>()))
                .map(|at| at.min(Utc::now()));

            ComplaintSeed {
                student,
                category,
                title: Sentence(2..6).fake::<String>().chars().take(100).collect(),
                description: Paragraph(1..3).fake::<String>().chars().take(1000).collect(),
                location: format!("Room {}", (100..450).fake::<u16>()),
                priority: PRIORITIES[(0..3).fake::<usize>()],
                urgency: URGENCIES[(0..3).fake::<usize>()],
                assigned_to: (status != ComplaintStatus::Pending).then_some(handler).flatten(),
                status,
                created_at,
                resolved_at,
            }
        })
        .collect()
}

/// Inserts complaints with ticket ids drawn from the shared counter.
///
/// Each batch reserves its block of sequence numbers in the same transaction
/// as the insert, so the API can keep issuing tickets while seeding runs.
pub async fn insert_complaints(
    db: &PgPool,
    tickets: &TicketConfig,
    complaints: &[ComplaintSeed],
) -> CliResult<usize> {
    let mut inserted = 0;

    for chunk in complaints.chunks(BATCH_SIZE) {
        let mut tx = db.begin().await?;
        let first = reserve_sequences(&mut tx, &tickets.prefix, chunk.len() as i64).await?;

        let mut query = String::from(
            "INSERT INTO complaints (ticket_id, student_id, category, title, description, location,
                                     priority, urgency, status, assigned_to, resolved_by, resolved_at,
                                     created_at, updated_at) VALUES ",
        );

        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            let base = i * 13;
            let placeholders: Vec<String> = (1..=13).map(|n| format!("${}", base + n)).collect();
            query.push_str(&format!(
                "({}, ${})",
                placeholders.join(", "),
                base + 13
            ));
        }

        let mut q = sqlx::query(&query);
        for (offset, complaint) in chunk.iter().enumerate() {
            let sequence = (first + offset as i64) as u64;
            let ticket = TicketId::format(&tickets.prefix, tickets.width, sequence);
            let resolved_by = complaint.resolved_at.and(complaint.assigned_to);

            q = q
                .bind(ticket)
                .bind(complaint.student)
                .bind(complaint.category)
                .bind(&complaint.title)
                .bind(&complaint.description)
                .bind(&complaint.location)
                .bind(complaint.priority)
                .bind(complaint.urgency)
                .bind(complaint.status)
                .bind(complaint.assigned_to)
                .bind(resolved_by)
                .bind(complaint.resolved_at)
                .bind(complaint.created_at);
        }

        q.execute(&mut *tx).await?;
        tx.commit().await?;
        inserted += chunk.len();
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_without_handler_everything_is_pending() {
        let students = vec![StudentId::from(Uuid::new_v4()); 3];
        let complaints = generate_complaints(&students, 4, None);

        assert_eq!(complaints.len(), 12);
        assert!(
            complaints
                .iter()
                .all(|c| c.status == ComplaintStatus::Pending && c.assigned_to.is_none())
        );
    }

    #[test]
    fn test_resolved_complaints_are_consistent() {
        let handler = AdminId::from(Uuid::new_v4());
        let students = vec![StudentId::from(Uuid::new_v4())];
        let complaints = generate_complaints(&students, 200, Some(handler));

        for complaint in complaints {
            assert!(complaint.title.len() <= 100);
            match complaint.status {
                ComplaintStatus::Resolved => {
                    let resolved_at = complaint.resolved_at.unwrap();
                    assert!(resolved_at >= complaint.created_at);
                    assert_eq!(complaint.assigned_to, Some(handler));
                }
                ComplaintStatus::Pending => assert!(complaint.assigned_to.is_none()),
                _ => assert!(complaint.resolved_at.is_none()),
            }
        }
    }
}
