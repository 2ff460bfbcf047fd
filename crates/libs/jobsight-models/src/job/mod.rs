//! Job analysis models.
//!
//! This module contains the records written by the analysis pipeline for
//! every analyzed job execution, the heuristic results attached to them, and
//! the filters used to search them.

pub mod filter;
pub mod job_heuristic_result;
pub mod job_result;
pub mod severity;
