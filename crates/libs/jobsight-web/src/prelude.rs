//! Common types and utilities.

/// Web layer error type.
pub use crate::error::Error;

/// Web layer result type.
pub type Result<T> = core::result::Result<T, Error>;
