//! Database connection management and migrations.

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;
use diesel_migrations::embed_migrations;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness};
use tracing::info;

use super::config::DbConfig;
use crate::prelude::*;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Database connection pool wrapper.
#[derive(Debug, Clone)]
pub struct DbConnection {
    /// PostgreSQL connection pool.
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

impl DbConnection {
    /// Create a new database connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use jobsight_models::db::{connection::DbConnection, config::DbConfig};
    ///
    /// let config = DbConfig::from_env().unwrap();
    /// let db = DbConnection::new(&config).unwrap();
    /// ```
    pub fn new(config: &DbConfig) -> Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)?;
        Ok(Self { pool })
    }

    /// Run database migrations and return configured connection.
    ///
    /// The schema is owned by the analysis pipeline in production; this is
    /// used by standalone deployments and by the database tests.
    pub fn setup(self) -> Result<Self> {
        info!("Running Database Migrations");
        let conn = &mut self.pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| Error::Migration(err.to_string()))?;
        info!("Applied {} migration(s)", applied.len());
        Ok(self)
    }
}
