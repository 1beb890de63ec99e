//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Which integration store implementation the server runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL through the sqlx pool (requires `DATABASE_URL`)
    #[default]
    Postgres,
    /// Process-local store; everything is lost on restart
    Memory,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required for the postgres backend): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `STORE_BACKEND` (optional): `postgres` or `memory`, defaults to `postgres`
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `CORS_ALLOW_ANY_ORIGIN` (optional): allow browser forms served from any origin
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub store_backend: StoreBackend,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default)]
    pub cors_allow_any_origin: bool,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Load configuration from an explicit list of variables instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars.into_iter().map(|(k, v)| (k.to_lowercase(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/vault")]))
            .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.database_max_connections, 5);
        assert!(!config.cors_allow_any_origin);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/vault")
        );
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let config = Config::from_vars(vars(&[
            ("STORE_BACKEND", "memory"),
            ("SERVER_PORT", "8080"),
            ("CORS_ALLOW_ANY_ORIGIN", "true"),
        ]))
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.server_port, 8080);
        assert!(config.cors_allow_any_origin);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Config::from_vars(vars(&[("STORE_BACKEND", "redis")])).is_err());
    }
}
