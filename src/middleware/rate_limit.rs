//! Per-client-IP rate limiting.
//!
//! Two keyed token-bucket limiters live in [`AppState`]: a general one layered
//! over the whole API and a stricter one over `/api/auth`. A request that
//! finds its bucket empty gets 429 with a `retry-after` header.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    DefaultKeyedRateLimiter, RateLimiter,
    clock::{Clock, DefaultClock},
};
use hostelcare_config::RateLimitConfig;
use hostelcare_core::AppError;

use crate::metrics::track_rate_limited;
use crate::state::AppState;

pub type IpRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Limiters shared by every clone of the router. `None` means unlimited.
#[derive(Clone, Default)]
pub struct RateLimiters {
    pub general: Option<Arc<IpRateLimiter>>,
    pub auth: Option<Arc<IpRateLimiter>>,
}

impl std::fmt::Debug for RateLimiters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiters")
            .field("general", &self.general.is_some())
            .field("auth", &self.auth.is_some())
            .finish()
    }
}

impl RateLimiters {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        if !config.enabled {
            return Self::default();
        }

        Self {
            general: Some(Arc::new(RateLimiter::keyed(config.general_quota()))),
            auth: Some(Arc::new(RateLimiter::keyed(config.auth_quota()))),
        }
    }

    /// Periodically forgets clients whose buckets are full again.
    pub fn spawn_cleanup(&self, every: Duration) {
        let limiters: Vec<_> = [self.general.clone(), self.auth.clone()]
            .into_iter()
            .flatten()
            .collect();
        if limiters.is_empty() {
            return;
        }

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(every).await;
                for limiter in &limiters {
                    limiter.retain_recent();
                    limiter.shrink_to_fit();
                }
            }
        });
    }
}

/// Client address: first `x-forwarded-for` entry, then the peer address.
pub fn client_ip(req: &Request) -> IpAddr {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn check(limiter: Option<&IpRateLimiter>, req: &Request, scope: &'static str) -> Option<Response> {
    let limiter = limiter?;
    let ip = client_ip(req);

    match limiter.check_key(&ip) {
        Ok(()) => None,
        Err(not_until) => {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            tracing::warn!(client_ip = %ip, scope, "Rate limit exceeded");
            track_rate_limited(scope);

            let mut response =
                AppError::too_many_requests("Too many requests, please try again later")
                    .into_response();
            let retry_after = wait.as_secs().max(1).to_string();
            if let Ok(value) = HeaderValue::from_str(&retry_after) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            Some(response)
        }
    }
}

pub async fn general_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check(state.rate_limiters.general.as_deref(), &req, "general") {
        Some(rejection) => rejection,
        None => next.run(req).await,
    }
}

pub async fn auth_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check(state.rate_limiters.auth.as_deref(), &req, "auth") {
        Some(rejection) => rejection,
        None => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/api/complaints");
        if let Some(value) = header {
            builder = builder.header("x-forwarded-for", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_client_ip_uses_first_forwarded_entry() {
        let req = request_with(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&req), "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_falls_back_to_connect_info() {
        let mut req = request_with(Some("not-an-ip"));
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 1, 2, 3], 4000))));
        assert_eq!(client_ip(&req), "10.1.2.3".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_without_any_source() {
        let req = request_with(None);
        assert_eq!(client_ip(&req), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_disabled_config_builds_no_limiters() {
        let limiters = RateLimiters::from_config(&RateLimitConfig::disabled());
        assert!(limiters.general.is_none());
        assert!(limiters.auth.is_none());
    }

    #[test]
    fn test_check_rejects_after_burst() {
        let config = RateLimitConfig {
            enabled: true,
            general_per_second: 1,
            general_burst_size: 1,
            auth_per_second: 1,
            auth_burst_size: 1,
        };
        let limiters = RateLimiters::from_config(&config);
        let req = request_with(Some("198.51.100.4"));

        assert!(check(limiters.general.as_deref(), &req, "general").is_none());
        let rejected = check(limiters.general.as_deref(), &req, "general").unwrap();
        assert_eq!(rejected.status().as_u16(), 429);
        assert!(rejected.headers().contains_key(header::RETRY_AFTER));

        let other = request_with(Some("198.51.100.5"));
        assert!(check(limiters.general.as_deref(), &other, "general").is_none());
    }
}
