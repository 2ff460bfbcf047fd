#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use jobsight_models::db::{config::DbConfig, connection::DbConnection};
use jobsight_models::job::job_heuristic_result::JobHeuristicResultCreate;
use jobsight_models::job::job_result::JobResultDb;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub struct DBTestContext {
    pub connection: DbConnection,
}

impl DBTestContext {
    pub fn new(url: &str) -> Self {
        let connection = DbConnection::new(&DbConfig::new(url).with_max_connections(2))
            .expect("Cannot connect to database");
        connection
            .pool
            .get()
            .expect("Couldn't get a connection from the pool")
            .run_pending_migrations(MIGRATIONS)
            .expect("Failed to run database migrations");
        Self { connection }
    }

    pub fn from_env() -> Self {
        Self::new(&std::env::var("DATABASE_URL").expect("Env Variable 'DATABASE_URL' missing"))
    }
}

impl Drop for DBTestContext {
    fn drop(&mut self) {
        self.connection
            .pool
            .get()
            .expect("Couldn't get a connection from the pool")
            .revert_all_migrations(MIGRATIONS)
            .expect("Failed to revert changes to db");
    }
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, day, hour, 0, 0).unwrap()
}

pub fn job(job_id: &str, username: &str, severity: i32, analysis_time: DateTime<Utc>) -> JobResultDb {
    JobResultDb {
        job_id: job_id.to_string(),
        job_name: format!("{job_id}-name"),
        username: username.to_string(),
        queue_name: "default".to_string(),
        start_time: analysis_time,
        analysis_time,
        severity,
        job_type: "MapReduce".to_string(),
        tracking_url: format!("https://rm/{job_id}"),
        job_exec_url: format!("https://scheduler/exec/{job_id}"),
        job_url: "https://scheduler/job/etl".to_string(),
        flow_exec_url: "https://scheduler/flow/1".to_string(),
        flow_url: "https://scheduler/flow".to_string(),
    }
}

pub fn heuristic(job_id: &str, analysis_name: &str, severity: i32) -> JobHeuristicResultCreate {
    JobHeuristicResultCreate {
        job_id: job_id.to_string(),
        analysis_name: analysis_name.to_string(),
        severity,
        details: "[]".to_string(),
    }
}
