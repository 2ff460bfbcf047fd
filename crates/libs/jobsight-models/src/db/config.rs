//! Database configuration management.

use std::fmt::Display;

use crate::prelude::*;

const DATABASE_URL: &str = "DATABASE_URL";

/// Database connection configuration.
pub struct DbConfig {
    /// PostgreSQL database URL.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl DbConfig {
    /// Create database configuration from environment variables.
    ///
    /// Reads the `DATABASE_URL` environment variable.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use jobsight_models::db::config::DbConfig;
    ///
    /// let config = DbConfig::from_env().unwrap();
    /// ```
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var(DATABASE_URL).map_err(|_| Error::EnvVariableMissing(DATABASE_URL))?;
        Ok(Self::new(database_url))
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

impl Display for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "REDACTED")
    }
}
