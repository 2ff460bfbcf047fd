//! Per-heuristic outcomes attached to an analyzed job.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::connection::DbConnection;
use crate::job::job_result::JobResultDb;
use crate::job::severity::Severity;
use crate::prelude::*;
use crate::schema::job_heuristic_result::dsl::*;

/// The outcome of one heuristic check applied to a job execution.
#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Associations, PartialEq, Serialize, Deserialize,
)]
#[diesel(table_name = crate::schema::job_heuristic_result)]
#[diesel(belongs_to(JobResultDb, foreign_key = job_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobHeuristicResultDb {
    /// Unique heuristic result ID.
    pub id: i32,
    /// The job this result belongs to.
    pub job_id: String,
    /// Name of the heuristic that produced this result.
    pub analysis_name: String,
    /// Severity ordinal, see [`Severity`].
    pub severity: i32,
    /// Heuristic specific details as a JSON document.
    pub details: String,
}

/// Data for creating a new heuristic result.
#[derive(Insertable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(table_name = crate::schema::job_heuristic_result)]
pub struct JobHeuristicResultCreate {
    pub job_id: String,
    pub analysis_name: String,
    pub severity: i32,
    pub details: String,
}

impl JobHeuristicResultCreate {
    /// Saves the heuristic result to the database.
    pub fn save(self, connection: &DbConnection) -> Result<JobHeuristicResultDb> {
        let conn = &mut connection.pool.get()?;
        Ok(diesel::insert_into(job_heuristic_result)
            .values(&self)
            .returning(JobHeuristicResultDb::as_returning())
            .get_result(conn)?)
    }
}

impl JobHeuristicResultDb {
    /// `None` when the stored ordinal is outside the known scale.
    pub fn severity(&self) -> Option<Severity> {
        Severity::try_from(self.severity).ok()
    }
}
