//! HTTP layer of Jobsight.
//!
//! Turns request parameters into job searches, groups and paginates the
//! results, and renders them either as HTML pages or as JSON.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod grouping;
pub mod help;
pub mod pagination;
pub mod params;
pub mod prelude;
pub mod state;
pub mod views;
