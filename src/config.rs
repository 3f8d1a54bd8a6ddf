use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Without one the service keeps its documents in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum number of pooled PostgreSQL connections
    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin allowed to call the API from a browser
    #[serde(default = "default_cors_allowed_origin")]
    pub cors_allowed_origin: String,

    /// Optional JSON file with foods, recipes and users loaded at startup
    #[serde(default)]
    pub seed_path: Option<String>,
}

fn default_max_db_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_iter(Vec::new()).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_db_connections, 5);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.cors_allowed_origin, "http://localhost:5173");
        assert_eq!(config.seed_path, None);
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/calories".to_string(),
            ),
            ("PORT".to_string(), "3000".to_string()),
            ("SEED_PATH".to_string(), "data/seed.json".to_string()),
        ];
        let config = Config::from_iter(vars).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/calories")
        );
        assert_eq!(config.port, 3000);
        assert_eq!(config.seed_path.as_deref(), Some("data/seed.json"));
    }

    #[test]
    fn test_invalid_port() {
        let vars = vec![("PORT".to_string(), "not-a-port".to_string())];
        assert!(Config::from_iter(vars).is_err());
    }
}
