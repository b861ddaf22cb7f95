//! # HostelCare Config
//!
//! Configuration types for the HostelCare API.
//!
//! Every structure is loaded from environment variables and falls back to a
//! default when a variable is missing or does not parse:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed origins
//! - [`rate_limit`]: per-client request quotas
//! - [`server`]: bind address, ports and observability switches
//! - [`ticket`]: ticket identifier format and allocation strategy
//!
//! # Example
//!
//! ```ignore
//! use hostelcare_config::{JwtConfig, TicketConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let ticket_config = TicketConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;
pub mod ticket;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use ticket::{TicketConfig, TicketStrategy};

/// Reads `key` through `lookup` and parses it, falling back to `default`.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
