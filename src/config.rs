use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://inventory.db".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 3,
        }
    }
}

impl Config {
    /// Read the configuration from the environment, loading `.env` first if it exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let max_connections = match env::var("MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("MAX_CONNECTIONS", raw))?,
            Err(_) => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections,
            acquire_timeout_secs: match env::var("ACQUIRE_TIMEOUT") {
                Ok(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber("ACQUIRE_TIMEOUT", raw))?,
                Err(_) => defaults.acquire_timeout_secs,
            },
        })
    }

    /// In-memory database, one connection so every call sees the same data.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be a number, got '{1}'")]
    InvalidNumber(&'static str, String),

    #[error("MAX_CONNECTIONS must be at least 1")]
    NoConnections,
}
