//! Analyzed job executions and the queries that read them.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::connection::DbConnection;
use crate::job::filter::{JobResultFilter, QueryShape};
use crate::job::job_heuristic_result::JobHeuristicResultDb;
use crate::job::severity::Severity;
use crate::prelude::*;
use crate::schema::{job_heuristic_result, job_result};

diesel::define_sql_function! {
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// One analyzed job execution.
///
/// Field order follows the `job_result` table.
#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Insertable, PartialEq, Serialize, Deserialize,
)]
#[diesel(table_name = crate::schema::job_result)]
#[diesel(primary_key(job_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobResultDb {
    /// Scheduler assigned job id.
    pub job_id: String,
    pub job_name: String,
    /// Owner of the job.
    pub username: String,
    pub queue_name: String,
    pub start_time: DateTime<Utc>,
    /// When the analysis pipeline processed the job.
    pub analysis_time: DateTime<Utc>,
    /// Worst severity over all heuristics, see [`Severity`].
    pub severity: i32,
    pub job_type: String,
    pub tracking_url: String,
    /// Identifies this execution of the job.
    pub job_exec_url: String,
    /// Identifies the job definition, shared by all of its executions.
    pub job_url: String,
    /// Identifies the flow execution the job ran in.
    pub flow_exec_url: String,
    pub flow_url: String,
}

/// A job together with every heuristic result recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(flatten)]
    pub job: JobResultDb,
    pub heuristic_results: Vec<JobHeuristicResultDb>,
}

impl JobAnalysis {
    pub fn job_id(&self) -> &str {
        &self.job.job_id
    }
}

impl JobResultDb {
    /// Saves the job to the database.
    pub fn save(self, connection: &DbConnection) -> Result<JobResultDb> {
        let conn = &mut connection.pool.get()?;
        Ok(diesel::insert_into(job_result::table)
            .values(&self)
            .returning(JobResultDb::as_returning())
            .get_result(conn)?)
    }

    /// `None` when the stored ordinal is outside the known scale.
    pub fn severity(&self) -> Option<Severity> {
        Severity::try_from(self.severity).ok()
    }

    pub fn fetch_by_id(target: &str, connection: &DbConnection) -> Result<Option<JobAnalysis>> {
        let conn = &mut connection.pool.get()?;
        let job = JobResultDb::by_id(target)
            .select(JobResultDb::as_select())
            .first(conn)
            .optional()?;
        match job {
            Some(job) => Ok(attach_heuristics(vec![job], conn)?.pop()),
            None => Ok(None),
        }
    }

    /// Every job of a flow execution, oldest analysis first.
    pub fn fetch_by_flow_exec_url(target: &str, connection: &DbConnection) -> Result<Vec<JobAnalysis>> {
        let conn = &mut connection.pool.get()?;
        let jobs = JobResultDb::by_flow_exec_url(target)
            .order((job_result::analysis_time.asc(), job_result::job_id.asc()))
            .select(JobResultDb::as_select())
            .load(conn)?;
        attach_heuristics(jobs, conn)
    }

    pub fn fetch_by_job_exec_url(
        target: &str,
        limit: i64,
        connection: &DbConnection,
    ) -> Result<Vec<JobAnalysis>> {
        let conn = &mut connection.pool.get()?;
        let jobs = JobResultDb::by_job_exec_url(target)
            .order((job_result::analysis_time.desc(), job_result::job_id.desc()))
            .limit(limit.max(0))
            .select(JobResultDb::as_select())
            .load(conn)?;
        attach_heuristics(jobs, conn)
    }

    /// Most recent executions of a job definition.
    pub fn fetch_by_job_url(
        target: &str,
        limit: i64,
        connection: &DbConnection,
    ) -> Result<Vec<JobAnalysis>> {
        let conn = &mut connection.pool.get()?;
        let jobs = JobResultDb::by_job_url(target)
            .order((job_result::analysis_time.desc(), job_result::job_id.desc()))
            .limit(limit.max(0))
            .select(JobResultDb::as_select())
            .load(conn)?;
        attach_heuristics(jobs, conn)
    }

    /// Filtered search, newest analysis first.
    pub fn search(
        filter: &JobResultFilter,
        offset: i64,
        limit: i64,
        connection: &DbConnection,
    ) -> Result<Vec<JobAnalysis>> {
        let conn = &mut connection.pool.get()?;
        debug!("Searching jobs {:?} as {:?}", filter, filter.shape());
        let jobs: Vec<JobResultDb> = JobResultDb::filtered(filter)
            .order((job_result::analysis_time.desc(), job_result::job_id.desc()))
            .offset(offset.max(0))
            .limit(limit.max(0))
            .load(conn)?;
        attach_heuristics(jobs, conn)
    }

    /// Number of jobs analyzed after `since`, optionally at exactly `severity`.
    pub fn count_analyzed_since(
        since: DateTime<Utc>,
        severity: Option<Severity>,
        connection: &DbConnection,
    ) -> Result<i64> {
        let conn = &mut connection.pool.get()?;
        let mut query = job_result::table
            .filter(job_result::analysis_time.gt(since))
            .into_boxed::<Pg>();
        if let Some(severity) = severity {
            query = query.filter(job_result::severity.eq(severity.value()));
        }
        Ok(query.count().get_result(conn)?)
    }

    pub fn fetch_latest_since(
        since: DateTime<Utc>,
        limit: i64,
        connection: &DbConnection,
    ) -> Result<Vec<JobAnalysis>> {
        let conn = &mut connection.pool.get()?;
        let jobs = job_result::table
            .filter(job_result::analysis_time.gt(since))
            .order((job_result::analysis_time.desc(), job_result::job_id.desc()))
            .limit(limit.max(0))
            .select(JobResultDb::as_select())
            .load(conn)?;
        attach_heuristics(jobs, conn)
    }

    fn filtered(filter: &JobResultFilter) -> job_result::BoxedQuery<'static, Pg> {
        let mut query = job_result::table.into_boxed();

        if let Some(name) = &filter.username {
            query = query.filter(lower(job_result::username).eq(name.to_lowercase()));
        }
        if let Some(kind) = &filter.job_type {
            query = query.filter(job_result::job_type.eq(kind.clone()));
        }
        if let Some(severity) = filter.severity {
            query = match (filter.shape(), &filter.analysis) {
                (QueryShape::WithHeuristics, Some(analysis)) => query.filter(
                    job_result::job_id.eq_any(
                        job_heuristic_result::table
                            .filter(job_heuristic_result::analysis_name.eq(analysis.clone()))
                            .filter(job_heuristic_result::severity.ge(severity.value()))
                            .select(job_heuristic_result::job_id),
                    ),
                ),
                _ => query.filter(job_result::severity.ge(severity.value())),
            };
        }
        if let Some(after) = filter.analyzed_after {
            query = query.filter(job_result::analysis_time.gt(after));
        }
        if let Some(before) = filter.analyzed_before {
            query = query.filter(job_result::analysis_time.lt(before));
        }
        query
    }
}

impl JobResultDb {
    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_id(target: &str) -> _ {
        job_result::table.filter(job_result::job_id.eq(target))
    }

    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_flow_exec_url(target: &str) -> _ {
        job_result::table.filter(job_result::flow_exec_url.eq(target))
    }

    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_job_exec_url(target: &str) -> _ {
        job_result::table.filter(job_result::job_exec_url.eq(target))
    }

    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_job_url(target: &str) -> _ {
        job_result::table.filter(job_result::job_url.eq(target))
    }
}

/// Loads the heuristic results of `jobs` in one query, keeping job order.
fn attach_heuristics(jobs: Vec<JobResultDb>, conn: &mut PgConnection) -> Result<Vec<JobAnalysis>> {
    if jobs.is_empty() {
        return Ok(Vec::new());
    }
    let heuristics = JobHeuristicResultDb::belonging_to(&jobs)
        .order(job_heuristic_result::id.asc())
        .select(JobHeuristicResultDb::as_select())
        .load(conn)?;
    Ok(heuristics
        .grouped_by(&jobs)
        .into_iter()
        .zip(jobs)
        .map(|(heuristic_results, job)| JobAnalysis {
            job,
            heuristic_results,
        })
        .collect())
}
