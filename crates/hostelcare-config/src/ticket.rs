//! Ticket identifier format and allocation strategy.
//!
//! # Environment Variables
//!
//! - `TICKET_PREFIX`: alphanumeric prefix (default: `TKT`)
//! - `TICKET_WIDTH`: zero-padded width of the sequence number, 1-18 (default: 6)
//! - `TICKET_ALLOCATION`: `counter` or `probe` (default: `counter`)
//! - `TICKET_MAX_ATTEMPTS`: attempt cap for the probe strategy (default: 32)

use std::fmt;
use std::str::FromStr;

use crate::{env_lookup, parse_or};

pub const DEFAULT_PREFIX: &str = "TKT";
pub const DEFAULT_WIDTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 32;

/// How a sequence number is chosen for a new complaint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TicketStrategy {
    /// Atomic upsert on a per-prefix counter row, in the complaint's transaction.
    #[default]
    Counter,
    /// Count-based guess retried on unique violations, bounded by `max_attempts`.
    Probe,
}

impl fmt::Display for TicketStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStrategy::Counter => write!(f, "counter"),
            TicketStrategy::Probe => write!(f, "probe"),
        }
    }
}

impl FromStr for TicketStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "counter" => Ok(TicketStrategy::Counter),
            "probe" => Ok(TicketStrategy::Probe),
            other => Err(format!("unknown ticket allocation strategy: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketConfig {
    pub prefix: String,
    pub width: usize,
    pub strategy: TicketStrategy,
    pub max_attempts: u32,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            width: DEFAULT_WIDTH,
            strategy: TicketStrategy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl TicketConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = match lookup("TICKET_PREFIX") {
            Some(p) if is_valid_prefix(p.trim()) => p.trim().to_ascii_uppercase(),
            Some(p) => {
                tracing::warn!(prefix = %p, "Invalid TICKET_PREFIX, using {DEFAULT_PREFIX}");
                DEFAULT_PREFIX.to_string()
            }
            None => DEFAULT_PREFIX.to_string(),
        };

        let strategy = match lookup("TICKET_ALLOCATION") {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Falling back to counter allocation");
                TicketStrategy::Counter
            }),
            None => TicketStrategy::Counter,
        };

        Self {
            prefix,
            width: parse_or(&lookup, "TICKET_WIDTH", DEFAULT_WIDTH).clamp(1, 18),
            strategy,
            max_attempts: parse_or(&lookup, "TICKET_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS).max(1),
        }
    }

    pub fn with_strategy(mut self, strategy: TicketStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.len() <= 10 && prefix.chars().all(|c| c.is_ascii_alphanumeric())
}
