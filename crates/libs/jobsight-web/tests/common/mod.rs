#![allow(dead_code)]

use std::borrow::Borrow;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jobsight_config::JobsightConfig;
use jobsight_models::job::filter::JobResultFilter;
use jobsight_models::job::job_heuristic_result::JobHeuristicResultDb;
use jobsight_models::job::job_result::{JobAnalysis, JobResultDb};
use jobsight_models::job::severity::Severity;
use jobsight_models::store::JobResultStore;
use jobsight_web::api::router;
use jobsight_web::help::HelpPages;
use jobsight_web::state::AppState;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

type StoreResult<T> = jobsight_models::prelude::Result<T>;

/// Keeps jobs in memory and answers lookups with the same semantics as the
/// database queries.
#[derive(Default)]
pub struct MemoryStore {
    pub jobs: Vec<JobAnalysis>,
}

impl MemoryStore {
    pub fn new(jobs: Vec<JobAnalysis>) -> Self {
        Self { jobs }
    }

    fn newest_first(&self, predicate: impl Fn(&JobAnalysis) -> bool) -> Vec<JobAnalysis> {
        let mut jobs: Vec<JobAnalysis> = self.jobs.iter().filter(|job| predicate(job)).cloned().collect();
        jobs.sort_by(|a, b| {
            (b.job.analysis_time, &b.job.job_id).cmp(&(a.job.analysis_time, &a.job.job_id))
        });
        jobs
    }
}

fn matches(filter: &JobResultFilter, analysis: &JobAnalysis) -> bool {
    let job = &analysis.job;
    if let Some(user) = &filter.username {
        if job.username.to_lowercase() != *user {
            return false;
        }
    }
    if let Some(kind) = &filter.job_type {
        if job.job_type != *kind {
            return false;
        }
    }
    if let Some(severity) = filter.severity {
        let passes = match &filter.analysis {
            Some(name) => analysis
                .heuristic_results
                .iter()
                .any(|result| result.analysis_name == *name && result.severity >= severity.value()),
            None => job.severity >= severity.value(),
        };
        if !passes {
            return false;
        }
    }
    if let Some(after) = filter.analyzed_after {
        if job.analysis_time <= after {
            return false;
        }
    }
    if let Some(before) = filter.analyzed_before {
        if job.analysis_time >= before {
            return false;
        }
    }
    true
}

fn page(jobs: Vec<JobAnalysis>, offset: i64, limit: i64) -> Vec<JobAnalysis> {
    jobs.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

impl JobResultStore for MemoryStore {
    fn fetch_by_id(&self, job_id: &str) -> StoreResult<Option<JobAnalysis>> {
        Ok(self.jobs.iter().find(|job| job.job_id() == job_id).cloned())
    }

    fn fetch_by_flow_exec_url(&self, flow_exec_url: &str) -> StoreResult<Vec<JobAnalysis>> {
        let mut jobs = self.newest_first(|job| job.job.flow_exec_url == flow_exec_url);
        jobs.reverse();
        Ok(jobs)
    }

    fn fetch_by_job_exec_url(&self, job_exec_url: &str, limit: i64) -> StoreResult<Vec<JobAnalysis>> {
        Ok(page(
            self.newest_first(|job| job.job.job_exec_url == job_exec_url),
            0,
            limit,
        ))
    }

    fn fetch_by_job_url(&self, job_url: &str, limit: i64) -> StoreResult<Vec<JobAnalysis>> {
        Ok(page(self.newest_first(|job| job.job.job_url == job_url), 0, limit))
    }

    fn search(
        &self,
        filter: &JobResultFilter,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<JobAnalysis>> {
        Ok(page(self.newest_first(|job| matches(filter, job)), offset, limit))
    }

    fn count_analyzed_since(
        &self,
        since: DateTime<Utc>,
        severity: Option<Severity>,
    ) -> StoreResult<i64> {
        Ok(self
            .jobs
            .iter()
            .filter(|job| job.job.analysis_time > since)
            .filter(|job| severity.is_none_or(|severity| job.job.severity == severity.value()))
            .count() as i64)
    }

    fn fetch_latest_since(&self, since: DateTime<Utc>, limit: i64) -> StoreResult<Vec<JobAnalysis>> {
        Ok(page(self.newest_first(|job| job.job.analysis_time > since), 0, limit))
    }
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, day, hour, minute, 0).unwrap()
}

pub struct JobBuilder {
    analysis: JobAnalysis,
}

impl JobBuilder {
    pub fn new(job_id: &str, analysis_time: DateTime<Utc>) -> Self {
        Self {
            analysis: JobAnalysis {
                job: JobResultDb {
                    job_id: job_id.to_string(),
                    job_name: format!("name-{job_id}"),
                    username: "alice".into(),
                    queue_name: "default".into(),
                    start_time: analysis_time - Duration::minutes(5),
                    analysis_time,
                    severity: 0,
                    job_type: "MapReduce".into(),
                    tracking_url: format!("https://rm/{job_id}"),
                    job_exec_url: format!("https://scheduler/exec/{job_id}"),
                    job_url: "https://scheduler/job/etl".into(),
                    flow_exec_url: "https://scheduler/flow/1".into(),
                    flow_url: "https://scheduler/flow".into(),
                },
                heuristic_results: Vec::new(),
            },
        }
    }

    pub fn user(mut self, username: &str) -> Self {
        self.analysis.job.username = username.to_string();
        self
    }

    pub fn job_type(mut self, job_type: &str) -> Self {
        self.analysis.job.job_type = job_type.to_string();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.analysis.job.severity = severity.value();
        self
    }

    pub fn job_url(mut self, job_url: &str) -> Self {
        self.analysis.job.job_url = job_url.to_string();
        self
    }

    pub fn job_exec_url(mut self, job_exec_url: &str) -> Self {
        self.analysis.job.job_exec_url = job_exec_url.to_string();
        self
    }

    pub fn flow_exec_url(mut self, flow_exec_url: &str) -> Self {
        self.analysis.job.flow_exec_url = flow_exec_url.to_string();
        self
    }

    pub fn heuristic(mut self, name: &str, severity: Severity) -> Self {
        let id = self.analysis.heuristic_results.len() as i32 + 1;
        self.analysis.heuristic_results.push(JobHeuristicResultDb {
            id,
            job_id: self.analysis.job.job_id.clone(),
            analysis_name: name.to_string(),
            severity: severity.value(),
            details: "[]".into(),
        });
        self
    }

    pub fn build(self) -> JobAnalysis {
        self.analysis
    }
}

pub struct ApiClient {
    pub url: String,
}

impl ApiClient {
    fn url<I, K, V>(&self, endpoint: &str, params: I) -> reqwest::Url
    where
        I: IntoIterator,
        I::Item: Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        reqwest::Url::parse_with_params(&format!("{}/{endpoint}", self.url), params)
            .expect("Couldn't create get request")
    }

    pub async fn get_text(&self, endpoint: &str, params: &[(&str, &str)]) -> (StatusCode, String) {
        let response = reqwest::get(self.url(endpoint, params))
            .await
            .expect("Failed to send http request");
        let status = response.status();
        let text = response.text().await.expect("Failed to get response text");
        (status, text)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> (StatusCode, T) {
        let (status, text) = self.get_text(endpoint, params).await;
        let value = serde_json::from_str(&text).expect("Couldn't Parse Value");
        (status, value)
    }
}

pub async fn spawn_app(jobs: Vec<JobAnalysis>) -> ApiClient {
    spawn_app_with(jobs, HelpPages::empty(), JobsightConfig::default()).await
}

pub async fn spawn_app_with(
    jobs: Vec<JobAnalysis>,
    help: HelpPages,
    config: JobsightConfig,
) -> ApiClient {
    let state = AppState::new(Arc::new(MemoryStore::new(jobs)), help, config)
        .expect("Failed to create app state");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    ApiClient {
        url: format!("http://{address}"),
    }
}
