use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL, used for behavior persistence and catalog caching
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Base URL of the hosted property catalog (Supabase REST)
    #[serde(default)]
    pub catalog_api_url: Option<String>,

    /// API key for the hosted property catalog
    #[serde(default)]
    pub catalog_api_key: Option<String>,

    /// JSON file with a property list, used when no hosted catalog is configured
    #[serde(default)]
    pub catalog_seed_path: Option<String>,

    /// Default number of recommendations per request
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Seconds an idle session's behavior stays in memory before it is reloaded from Redis
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_recommendation_limit() -> usize {
    6
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Hosted catalog credentials, if both halves are configured
    pub fn catalog_credentials(&self) -> Option<(String, String)> {
        match (&self.catalog_api_url, &self.catalog_api_key) {
            (Some(url), Some(key)) => Some((url.clone(), key.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.recommendation_limit, 6);
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_idle_secs, 1800);
        assert!(config.catalog_credentials().is_none());
    }

    #[test]
    fn test_catalog_credentials_require_both_values() {
        let config: Config = envy::from_iter(vec![
            ("CATALOG_API_URL".to_string(), "https://db.example.co".to_string()),
            ("RECOMMENDATION_LIMIT".to_string(), "9".to_string()),
        ])
        .unwrap();
        assert!(config.catalog_credentials().is_none());
        assert_eq!(config.recommendation_limit, 9);

        let config: Config = envy::from_iter(vec![
            ("CATALOG_API_URL".to_string(), "https://db.example.co".to_string()),
            ("CATALOG_API_KEY".to_string(), "anon-key".to_string()),
        ])
        .unwrap();
        assert_eq!(
            config.catalog_credentials(),
            Some(("https://db.example.co".to_string(), "anon-key".to_string()))
        );
    }
}
