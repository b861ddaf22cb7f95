use hostelcare_config::{CorsConfig, JwtConfig, RateLimitConfig, TicketConfig};
use hostelcare_db::PgPool;

use crate::middleware::rate_limit::RateLimiters;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub ticket_config: TicketConfig,
    pub rate_limiters: RateLimiters,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        ticket_config: TicketConfig,
        rate_limit_config: &RateLimitConfig,
    ) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
            ticket_config,
            rate_limiters: RateLimiters::from_config(rate_limit_config),
        }
    }

    pub fn from_env(db: PgPool) -> Self {
        Self::new(
            db,
            JwtConfig::from_env(),
            CorsConfig::from_env(),
            TicketConfig::from_env(),
            &RateLimitConfig::from_env(),
        )
    }
}
