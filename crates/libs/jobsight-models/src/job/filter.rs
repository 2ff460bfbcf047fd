//! Search predicates over analyzed jobs.

use chrono::{DateTime, Utc};

use super::severity::Severity;

/// Which tables a search has to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Every predicate is on `job_result`.
    JobResultOnly,
    /// The severity threshold applies to a named heuristic, so the
    /// heuristic table takes part in the query.
    WithHeuristics,
}

/// Optional predicates for a job search. `None` means "not filtered".
///
/// Values are expected to be already normalized: trimmed, non-empty and,
/// for `username`, lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResultFilter {
    /// Matched case-insensitively against the job owner.
    pub username: Option<String>,
    pub job_type: Option<String>,
    /// Minimum severity, inclusive.
    pub severity: Option<Severity>,
    /// Restricts the severity threshold to one heuristic. Has no effect
    /// without `severity`.
    pub analysis: Option<String>,
    /// Exclusive lower bound on the analysis time.
    pub analyzed_after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the analysis time.
    pub analyzed_before: Option<DateTime<Utc>>,
}

impl JobResultFilter {
    pub fn shape(&self) -> QueryShape {
        if self.severity.is_some() && self.analysis.is_some() {
            QueryShape::WithHeuristics
        } else {
            QueryShape::JobResultOnly
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}
