//! Read access to analyzed jobs, as needed by the web layer.

use chrono::{DateTime, Utc};

use crate::db::connection::DbConnection;
use crate::job::filter::JobResultFilter;
use crate::job::job_result::{JobAnalysis, JobResultDb};
use crate::job::severity::Severity;
use crate::prelude::*;

/// Lookups the reporting endpoints perform.
///
/// Implemented by [`DbConnection`]; other implementations let the web layer
/// run without a database.
pub trait JobResultStore: Send + Sync {
    fn fetch_by_id(&self, job_id: &str) -> Result<Option<JobAnalysis>>;

    fn fetch_by_flow_exec_url(&self, flow_exec_url: &str) -> Result<Vec<JobAnalysis>>;

    fn fetch_by_job_exec_url(&self, job_exec_url: &str, limit: i64) -> Result<Vec<JobAnalysis>>;

    fn fetch_by_job_url(&self, job_url: &str, limit: i64) -> Result<Vec<JobAnalysis>>;

    /// Matches of `filter` ordered by analysis time then job id, both descending.
    fn search(&self, filter: &JobResultFilter, offset: i64, limit: i64)
    -> Result<Vec<JobAnalysis>>;

    fn count_analyzed_since(&self, since: DateTime<Utc>, severity: Option<Severity>)
    -> Result<i64>;

    fn fetch_latest_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<JobAnalysis>>;
}

impl JobResultStore for DbConnection {
    fn fetch_by_id(&self, job_id: &str) -> Result<Option<JobAnalysis>> {
        JobResultDb::fetch_by_id(job_id, self)
    }

    fn fetch_by_flow_exec_url(&self, flow_exec_url: &str) -> Result<Vec<JobAnalysis>> {
        JobResultDb::fetch_by_flow_exec_url(flow_exec_url, self)
    }

    fn fetch_by_job_exec_url(&self, job_exec_url: &str, limit: i64) -> Result<Vec<JobAnalysis>> {
        JobResultDb::fetch_by_job_exec_url(job_exec_url, limit, self)
    }

    fn fetch_by_job_url(&self, job_url: &str, limit: i64) -> Result<Vec<JobAnalysis>> {
        JobResultDb::fetch_by_job_url(job_url, limit, self)
    }

    fn search(
        &self,
        filter: &JobResultFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobAnalysis>> {
        JobResultDb::search(filter, offset, limit, self)
    }

    fn count_analyzed_since(
        &self,
        since: DateTime<Utc>,
        severity: Option<Severity>,
    ) -> Result<i64> {
        JobResultDb::count_analyzed_since(since, severity, self)
    }

    fn fetch_latest_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<JobAnalysis>> {
        JobResultDb::fetch_latest_since(since, limit, self)
    }
}
