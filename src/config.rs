//! Runtime configuration loaded from the environment (and `.env`)

use crate::error::MemoryError;
use crate::Result;
use std::env;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TABLE: &str = "preference_documents";
pub const DEFAULT_USER_ID: &str = "Chris";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Postgres connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub table_name: String,
    /// User the tool endpoint acts for when a request names none
    pub default_user_id: String,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            table_name: DEFAULT_TABLE.to_string(),
            default_user_id: DEFAULT_USER_ID.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| MemoryError::Config(format!("invalid port: {}", raw)))?,
            None => defaults.port,
        };

        let max_connections = match non_empty("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                MemoryError::Config(format!("invalid DB_MAX_CONNECTIONS: {}", raw))
            })?,
            None => defaults.max_connections,
        };

        let table_name = non_empty("PREFERENCE_TABLE").unwrap_or(defaults.table_name);
        if !is_valid_identifier(&table_name) {
            return Err(MemoryError::Config(format!(
                "invalid PREFERENCE_TABLE: {}",
                table_name
            )));
        }

        Ok(Self {
            port,
            database_url: non_empty("POSTGRES_URL").or_else(|| non_empty("DATABASE_URL")),
            table_name,
            default_user_id: non_empty("DEFAULT_USER_ID").unwrap_or(defaults.default_user_id),
            max_connections,
        })
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
