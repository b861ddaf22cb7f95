use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use hostelcare_core::hash_password;
use hostelcare_db::PgPool;
use hostelcare_models::StudentId;
use rayon::prelude::*;
use uuid::Uuid;

use super::SEED_EMAIL_DOMAIN;
use super::models::StudentSeed;
use crate::CliResult;

const BATCH_SIZE: usize = 500;
const BLOCKS: [&str; 4] = ["A", "B", "C", "D"];

/// Generates `count` students sharing one password hash.
///
/// Identifiers embed a short random tag so repeated seed runs do not collide.
pub fn generate_students(count: usize, password: &str) -> CliResult<Vec<StudentSeed>> {
    let password_hash =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;
    let run = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    let run_number = u32::from_str_radix(&run, 16).unwrap_or(0) % 1_000_000;

    let students = (0..count)
        .into_par_iter()
        .map(|i| {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let block = BLOCKS[i % BLOCKS.len()];

            StudentSeed {
                student_id: format!("SEED{run}{i:05}"),
                name: format!("{first} {last}"),
                email: format!(
                    "{}.{}.{}{}@{SEED_EMAIL_DOMAIN}",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    run.to_lowercase(),
                    i
                ),
                mobile: format!("+1{run_number:06}{i:05}"),
                room_number: format!("{}{:02}", (1..5).fake::<u8>(), (1..40).fake::<u8>()),
                block: block.to_string(),
                password_hash: password_hash.clone(),
            }
        })
        .collect();

    Ok(students)
}

pub async fn insert_students(db: &PgPool, students: &[StudentSeed]) -> CliResult<Vec<StudentId>> {
    let mut ids = Vec::with_capacity(students.len());
    let mut tx = db.begin().await?;

    for chunk in students.chunks(BATCH_SIZE) {
        let mut query = String::from(
            "INSERT INTO students (student_id, name, email, mobile, room_number, block, password) VALUES ",
        );

        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            let base = i * 7;
            query.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
                base + 1,
                base + 2,
                base + 3,
                base + 4,
                base + 5,
                base + 6,
                base + 7
            ));
        }
        query.push_str(" RETURNING id");

        let mut q = sqlx::query_scalar::<_, StudentId>(&query);
        for student in chunk {
            q = q
                .bind(&student.student_id)
                .bind(&student.name)
                .bind(&student.email)
                .bind(&student.mobile)
                .bind(&student.room_number)
                .bind(&student.block)
                .bind(&student.password_hash);
        }

        ids.extend(q.fetch_all(&mut *tx).await?);
    }

    tx.commit().await?;
    Ok(ids)
}
