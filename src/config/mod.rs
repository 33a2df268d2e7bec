use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_duration_hours: i64,
}

/// Where proof-of-payment uploads land. "local" writes under `local_dir`;
/// "http" posts to an external object store at `endpoint`.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub provider: String,
    pub local_dir: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub folder: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            local_dir: "uploads".to_string(),
            endpoint: None,
            api_key: None,
            folder: Some("outreach".to_string()),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("storage.provider", "local")?
            .set_default("storage.local_dir", "uploads")?
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (with ALMONER__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ALMONER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://almoner.db".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_secret: "change-me-in-production".to_string(),
                session_duration_hours: 24,
            },
            storage: StorageConfig::default(),
        }
    }
}
