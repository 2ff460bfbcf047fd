//! Error types for the Jobsight server.

/// Errors that stop the server.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] jobsight_config::error::Error),

    #[error(transparent)]
    Model(#[from] jobsight_models::error::Error),

    #[error(transparent)]
    Web(#[from] jobsight_web::error::Error),
}
