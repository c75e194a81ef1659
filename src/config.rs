use std::env;
use std::net::SocketAddr;

use crate::shared::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Runtime configuration, read once at start-up
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Loads configuration from the environment (and `.env`, if present)
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let bind_addr: SocketAddr = env::var("AMA_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| AppError::InvalidArgument(format!("AMA_BIND_ADDR: {}", e)))?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let db_max_connections: u32 = match env::var("AMA_DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::InvalidArgument(format!("AMA_DB_MAX_CONNECTIONS: {}", e))
            })?,
            Err(_) => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            bind_addr,
            database_url,
            db_max_connections,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 8080).into(),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}
