//! Ticket sequence counters.
//!
//! One row in `ticket_counters` per prefix. Every reservation compares the
//! counter with the highest sequence already present in `complaints` and
//! continues after whichever is larger, so tickets written by count-based
//! allocation or imported by hand are never handed out again.

use sqlx::PgConnection;

/// Reserves `count` consecutive sequence numbers for `prefix` and returns the
/// first one.
///
/// The upsert holds the counter row lock until the surrounding transaction
/// ends, so callers must run it in the same transaction as the insert that
/// consumes the numbers. A rolled back transaction leaves the counter
/// untouched.
pub async fn reserve_sequences(
    conn: &mut PgConnection,
    prefix: &str,
    count: i64,
) -> Result<i64, sqlx::Error> {
    let last: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO ticket_counters (name, value)
        VALUES (
            $1,
            COALESCE(
                (SELECT MAX(SUBSTRING(ticket_id FROM $2::INT)::BIGINT)
                 FROM complaints
                 WHERE ticket_id ~ $3),
                0
            ) + $4
        )
        ON CONFLICT (name) DO UPDATE
            SET value = GREATEST(ticket_counters.value + $4, EXCLUDED.value),
                updated_at = NOW()
        RETURNING value
        "#,
    )
    .bind(prefix)
    .bind(digits_start(prefix))
    .bind(sequence_pattern(prefix))
    .bind(count)
    .fetch_one(&mut *conn)
    .await?;

    Ok(last - count + 1)
}

/// Number of complaints currently stored, the starting guess for probing.
pub async fn complaint_count(conn: &mut PgConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
        .fetch_one(&mut *conn)
        .await
}

pub async fn ticket_exists(conn: &mut PgConnection, ticket_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM complaints WHERE ticket_id = $1)")
        .bind(ticket_id)
        .fetch_one(&mut *conn)
        .await
}

/// 1-indexed position of the first digit after `prefix`.
fn digits_start(prefix: &str) -> i32 {
    prefix.len() as i32 + 1
}

/// Matches ids issued under `prefix` whose sequence fits in a BIGINT.
fn sequence_pattern(prefix: &str) -> String {
    format!("^{prefix}[0-9]{{1,18}}$")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_start_follows_prefix() {
        assert_eq!(digits_start("TKT"), 4);
        assert_eq!(digits_start("HC"), 3);
    }

    #[test]
    fn test_sequence_pattern() {
        assert_eq!(sequence_pattern("TKT"), "^TKT[0-9]{1,18}$");
    }
}
