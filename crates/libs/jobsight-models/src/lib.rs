//! Database models and ORM layer for Jobsight.
//!
//! Provides the Diesel schema, the job analysis models written by the
//! analysis pipeline, and the read-side queries used by the web layer.
//!
//! # Usage
//!
//! ```rust,no_run
//! use jobsight_models::db::{config::DbConfig, connection::DbConnection};
//! use jobsight_models::job::job_result::JobResultDb;
//!
//! let config = DbConfig::from_env().unwrap();
//! let connection = DbConnection::new(&config).unwrap();
//!
//! let jobs = JobResultDb::fetch_by_flow_exec_url("https://scheduler/flow/42", &connection).unwrap();
//! println!("Found {} jobs", jobs.len());
//! ```

pub mod db;
pub mod error;
pub mod job;
pub mod prelude;
mod schema;
pub mod store;
