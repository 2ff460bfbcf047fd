//! Configuration management for Jobsight.
//!
//! Every setting has a default, so an empty file (or no file at all) is a
//! valid configuration.
//!
//! # Usage
//!
//! ```rust
//! use jobsight_config::JobsightConfig;
//!
//! let config = JobsightConfig::from_toml(
//!     r#"
//!     [search]
//!     page_length = 50
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.search.page_length, 50);
//! assert_eq!(config.search.page_bar_length, 5);
//! ```

pub mod error;
pub mod jobsight_config;
pub mod prelude;

pub use jobsight_config::{
    DashboardConfig, HeuristicConfig, JobsightConfig, SearchConfig, ServerConfig,
};
