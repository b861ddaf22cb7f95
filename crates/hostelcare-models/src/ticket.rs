//! Human-facing ticket identifiers.
//!
//! A ticket id is a prefix followed by a zero-padded decimal sequence number,
//! e.g. `TKT000042`. Sequence numbers wider than the pad width are written in
//! full (`TKT1000000`), so distinct sequence numbers always give distinct ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(transparent)]
#[serde(transparent)]
#[schema(value_type = String, example = "TKT000042")]
pub struct TicketId(String);

impl TicketId {
    pub fn format(prefix: &str, width: usize, sequence: u64) -> Self {
        Self(format!("{prefix}{sequence:0width$}"))
    }

    /// Extracts the sequence number if `self` was issued under `prefix`.
    pub fn sequence(&self, prefix: &str) -> Option<u64> {
        let digits = self.0.strip_prefix(prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TicketId({})", self.0)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_width() {
        assert_eq!(TicketId::format("TKT", 6, 42).as_str(), "TKT000042");
        assert_eq!(TicketId::format("TKT", 6, 1).as_str(), "TKT000001");
        assert_eq!(TicketId::format("HC", 3, 7).as_str(), "HC007");
    }

    #[test]
    fn test_format_overflowing_width_keeps_all_digits() {
        assert_eq!(TicketId::format("TKT", 6, 1_000_000).as_str(), "TKT1000000");
        assert_ne!(
            TicketId::format("TKT", 6, 1_000_000),
            TicketId::format("TKT", 6, 100_000)
        );
    }

    #[test]
    fn test_sequence() {
        let ticket = TicketId::format("TKT", 6, 42);
        assert_eq!(ticket.sequence("TKT"), Some(42));
        assert_eq!(ticket.sequence("HC"), None);
        assert_eq!(TicketId("TKT".into()).sequence("TKT"), None);
        assert_eq!(TicketId("TKT00A1".into()).sequence("TKT"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let ticket = TicketId::format("TKT", 6, 9);
        assert_eq!(serde_json::to_string(&ticket).unwrap(), r#""TKT000009""#);
    }

    #[test]
    fn test_ordering_follows_sequence_within_width() {
        let mut tickets = vec![
            TicketId::format("TKT", 6, 3),
            TicketId::format("TKT", 6, 1),
            TicketId::format("TKT", 6, 2),
        ];
        tickets.sort();
        let seqs: Vec<_> = tickets.iter().filter_map(|t| t.sequence("TKT")).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }
}
