use crate::{env_lookup, parse_or};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET is not set, using the development secret");
                DEFAULT_SECRET.to_string()
            });

        Self {
            secret,
            access_token_expiry: parse_or(&lookup, "JWT_ACCESS_EXPIRY", 3600), // 1 hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = JwtConfig::from_lookup(|_| None);
        assert_eq!(config.secret, DEFAULT_SECRET);
        assert_eq!(config.access_token_expiry, 3600);
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("JWT_SECRET", "s3cret"),
            ("JWT_ACCESS_EXPIRY", "900"),
        ]);
        let config = JwtConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.access_token_expiry, 900);
    }

    #[test]
    fn test_unparseable_expiry_falls_back() {
        let config = JwtConfig::from_lookup(|k| {
            (k == "JWT_ACCESS_EXPIRY").then(|| "an hour".to_string())
        });
        assert_eq!(config.access_token_expiry, 3600);
    }
}
