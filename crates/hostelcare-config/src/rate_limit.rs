//! Rate limiting configuration for API endpoints.
//!
//! Limits are per client IP and follow the token bucket model implemented
//! by `governor`: tokens are replenished at the configured rate, each request
//! consumes one, and the burst size caps how many can accumulate.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: set to `false` to disable limiting (default: true)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: general replenish rate (default: 10)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: general burst size (default: 30)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: auth replenish rate (default: 2)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: auth burst size (default: 5)
//!
//! Auth endpoints get the stricter quota to slow down credential guessing.

use std::num::NonZeroU32;

use governor::Quota;

use crate::{env_lookup, parse_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests per second for general endpoints.
    pub general_per_second: u32,
    /// Burst size for general endpoints.
    pub general_burst_size: u32,
    /// Requests per second for auth endpoints.
    pub auth_per_second: u32,
    /// Burst size for auth endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_second: 10,
            general_burst_size: 30,
            auth_per_second: 2,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enabled: parse_or(&lookup, "RATE_LIMIT_ENABLED", defaults.enabled),
            general_per_second: parse_or(
                &lookup,
                "RATE_LIMIT_GENERAL_PER_SECOND",
                defaults.general_per_second,
            ),
            general_burst_size: parse_or(
                &lookup,
                "RATE_LIMIT_GENERAL_BURST_SIZE",
                defaults.general_burst_size,
            ),
            auth_per_second: parse_or(
                &lookup,
                "RATE_LIMIT_AUTH_PER_SECOND",
                defaults.auth_per_second,
            ),
            auth_burst_size: parse_or(
                &lookup,
                "RATE_LIMIT_AUTH_BURST_SIZE",
                defaults.auth_burst_size,
            ),
        }
    }

    /// A configuration with limiting switched off, used by tests that
    /// fire many requests from one address.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn general_quota(&self) -> Quota {
        quota(self.general_per_second, self.general_burst_size)
    }

    #[must_use]
    pub fn auth_quota(&self) -> Quota {
        quota(self.auth_per_second, self.auth_burst_size)
    }
}

/// Zero values are raised to one; a quota of zero is not representable.
fn quota(per_second: u32, burst_size: u32) -> Quota {
    let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(rate).allow_burst(burst)
}
