//! Configuration error types.

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// A value is out of its accepted range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
