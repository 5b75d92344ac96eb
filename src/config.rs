use std::env;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://tasks.db";
const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub server_address: String,
    pub max_connections: u32,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let server_address =
            lookup("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.into());

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "DB_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            },
        };

        Ok(Config {
            database_url,
            server_address,
            max_connections,
        })
    }
}
