//! Process-level settings: bind address, ports and observability.

use crate::{env_lookup, parse_or};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Port of the separate Prometheus scrape endpoint
    pub metrics_port: u16,
    /// Turns off the metrics exporter and the OTLP trace layer
    pub observability_enabled: bool,
    pub log_dir: String,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000),
            metrics_port: parse_or(&lookup, "METRICS_PORT", 9090),
            observability_enabled: parse_or(&lookup, "OBSERVABILITY_ENABLED", true),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "storage/logs".to_string()),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|s| !s.is_empty()),
            service_name: lookup("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| "hostelcare".to_string()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.host, self.metrics_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.metrics_address(), "0.0.0.0:9090");
        assert!(config.observability_enabled);
        assert_eq!(config.log_dir, "storage/logs");
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_empty_otlp_endpoint_is_none() {
        let config = ServerConfig::from_lookup(|k| {
            (k == "OTEL_EXPORTER_OTLP_ENDPOINT").then(String::new)
        });
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_observability_switch() {
        let config = ServerConfig::from_lookup(|k| {
            (k == "OBSERVABILITY_ENABLED").then(|| "false".to_string())
        });
        assert!(!config.observability_enabled);
    }
}
