use crate::env_lookup;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins() {
        let config = CorsConfig::from_lookup(|_| None);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_origins_are_trimmed_and_blank_entries_dropped() {
        let config = CorsConfig::from_lookup(|_| {
            Some(" https://hostel.example.edu , ,https://admin.example.edu".to_string())
        });
        assert_eq!(
            config.allowed_origins,
            vec![
                "https://hostel.example.edu".to_string(),
                "https://admin.example.edu".to_string()
            ]
        );
    }
}
