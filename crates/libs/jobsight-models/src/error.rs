//! Database error types.

/// Database operation errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Database connection pool error.
    #[error(transparent)]
    R2D2(#[from] diesel::r2d2::PoolError),

    /// Diesel ORM operation error.
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    /// Pending migrations could not be applied.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A required environment variable is not set.
    #[error("Env Variable '{0}' missing")]
    EnvVariableMissing(&'static str),

    /// A severity value outside of the known scale.
    #[error("Invalid severity '{0}'")]
    InvalidSeverity(String),
}
