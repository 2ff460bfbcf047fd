//! Routes and request handlers.
//!
//! HTML pages render errors as a message page with the matching status;
//! `/rest` endpoints answer with the JSON error body of [`Error`].

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use jobsight_models::job::job_result::JobAnalysis;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{debug, error};

use crate::grouping::{FlowComparison, GroupBy, compare_flows, group_jobs};
use crate::pagination::PaginationStats;
use crate::params::{
    COMPARE_FLOW_URL1, COMPARE_FLOW_URL2, FLOW_EXEC_URL, FLOW_URL, ID, JOB_ID, JOB_URL,
    QueryParams, TOPIC,
};
use crate::prelude::*;
use crate::state::AppState;
use crate::views::{SearchView, Views};

type Params = Query<Vec<(String, String)>>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/search", get(search_page))
        .route("/compare", get(compare_page))
        .route("/help", get(help_page))
        .route("/jobexecs", get(job_execs_page))
        .route("/flowrelated", get(flow_related_page))
        .route("/rest/job", get(rest_job))
        .route("/rest/jobexec", get(rest_job_exec))
        .route("/rest/flowexec", get(rest_flow_exec))
        .route("/rest/search", get(rest_search))
        .route("/rest/compare", get(rest_compare))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/* Pages */

async fn dashboard_page(State(state): State<AppState>) -> Response {
    let result = dashboard(&state).await;
    html_page(&state.views, result.map(|html| (StatusCode::OK, html)))
}

async fn search_page(State(state): State<AppState>, Query(params): Params) -> Response {
    let params = QueryParams::from(params);
    let result = search_view(&state, &params).and_then(|view| {
        let status = if matches!(view, SearchView::Job(None)) {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        Ok((status, state.views.search(&params, &view)?))
    });
    html_page(&state.views, result)
}

async fn compare_page(State(state): State<AppState>, Query(params): Params) -> Response {
    let params = QueryParams::from(params);
    let result = comparison(&state, &params).and_then(|comparison| state.views.compare(&comparison));
    html_page(&state.views, result.map(|html| (StatusCode::OK, html)))
}

async fn help_page(State(state): State<AppState>, Query(params): Params) -> Response {
    let params = QueryParams::from(params);
    let result = state.views.help(&state.help, params.get_trimmed(TOPIC));
    html_page(&state.views, result.map(|html| (StatusCode::OK, html)))
}

async fn job_execs_page(State(state): State<AppState>, Query(params): Params) -> Response {
    let params = QueryParams::from(params);
    let result = required(&params, JOB_URL).and_then(|job_url| {
        let jobs = state
            .store
            .fetch_by_job_url(job_url, to_limit(state.config.search.other_executions_limit))?;
        let groups = non_empty_groups(jobs, format!("Unable to find record on job url: {job_url}"))?;
        state.views.grouped_jobs("Other executions", job_url, &groups)
    });
    html_page(&state.views, result.map(|html| (StatusCode::OK, html)))
}

async fn flow_related_page(State(state): State<AppState>, Query(params): Params) -> Response {
    let params = QueryParams::from(params);
    let result = required(&params, FLOW_EXEC_URL).and_then(|flow_exec_url| {
        let jobs = state.store.fetch_by_flow_exec_url(flow_exec_url)?;
        let groups = non_empty_groups(
            jobs,
            format!("Unable to find record on flow execution: {flow_exec_url}"),
        )?;
        state
            .views
            .grouped_jobs("Jobs in flow execution", flow_exec_url, &groups)
    });
    html_page(&state.views, result.map(|html| (StatusCode::OK, html)))
}

/* REST */

async fn rest_job(State(state): State<AppState>, Query(params): Params) -> Result<Json<JobAnalysis>> {
    let params = QueryParams::from(params);
    let job_id = required(&params, ID)?;
    state
        .store
        .fetch_by_id(job_id)?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Unable to find record on job id: {job_id}")))
}

async fn rest_job_exec(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Vec<JobAnalysis>>> {
    let params = QueryParams::from(params);
    let job_exec_url = required(&params, ID)?;
    let jobs = state
        .store
        .fetch_by_job_exec_url(job_exec_url, to_limit(state.config.search.other_executions_limit))?;
    if jobs.is_empty() {
        return Err(Error::NotFound(format!(
            "Unable to find record on job execution url: {job_exec_url}"
        )));
    }
    Ok(Json(jobs))
}

async fn rest_flow_exec(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<BTreeMap<String, Vec<JobAnalysis>>>> {
    let params = QueryParams::from(params);
    let flow_exec_url = required(&params, ID)?;
    let jobs = state.store.fetch_by_flow_exec_url(flow_exec_url)?;
    let groups = non_empty_groups(
        jobs,
        format!("Unable to find record on flow execution url: {flow_exec_url}"),
    )?;
    Ok(Json(groups))
}

async fn rest_search(State(state): State<AppState>, Query(params): Params) -> Result<Response> {
    let params = QueryParams::from(params);
    if let Some(job_id) = params.get_trimmed(JOB_ID) {
        let job = state
            .store
            .fetch_by_id(job_id)?
            .ok_or_else(|| Error::NotFound(format!("Unable to find record on job id: {job_id}")))?;
        return Ok(Json(job).into_response());
    }
    if let Some(flow_url) = params.get_trimmed(FLOW_URL) {
        return Ok(Json(state.store.fetch_by_flow_exec_url(flow_url)?).into_response());
    }

    let page_length = state.config.search.rest_page_length;
    let offset = (params.page() - 1).saturating_mul(page_length);
    let jobs = state
        .store
        .search(&params.filter(), to_limit(offset), to_limit(page_length))?;
    Ok(Json(jobs).into_response())
}

async fn rest_compare(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<FlowComparison>> {
    let params = QueryParams::from(params);
    Ok(Json(comparison(&state, &params)?))
}

/* Shared */

async fn dashboard(state: &AppState) -> Result<String> {
    let counts = state.dashboard.counts(state.store.clone()).await?;
    let since = state.dashboard.window_start(Utc::now());
    let latest = state
        .store
        .fetch_latest_since(since, to_limit(state.config.dashboard.latest_limit))?;
    state
        .views
        .dashboard(&counts, state.config.dashboard.window_hours, &latest)
}

fn search_view(state: &AppState, params: &QueryParams) -> Result<SearchView> {
    if let Some(job_id) = params.get_trimmed(JOB_ID) {
        return Ok(SearchView::Job(state.store.fetch_by_id(job_id)?));
    }
    if let Some(flow_url) = params.get_trimmed(FLOW_URL) {
        let jobs = state.store.fetch_by_flow_exec_url(flow_url)?;
        if jobs.is_empty() {
            return Ok(SearchView::Empty);
        }
        return Ok(SearchView::Flow {
            flow_url: flow_url.to_string(),
            groups: group_jobs(jobs, GroupBy::JobExecutionUrl),
        });
    }

    let config = &state.config.search;
    let mut stats = PaginationStats::new(config.page_length, config.page_bar_length);
    stats.set_current_page(params.page());
    stats.set_query_string(params.query_string_without_page());

    let mut jobs = state.store.search(
        &params.filter(),
        to_limit(stats.fetch_offset()),
        to_limit(stats.fetch_limit()),
    )?;
    let Some(window) = stats.page_window(jobs.len()) else {
        debug!(
            "No results for page {} ({} rows fetched)",
            stats.current_page(),
            jobs.len()
        );
        return Ok(SearchView::Empty);
    };
    let page_bar = stats.page_bar(jobs.len());
    Ok(SearchView::Results {
        jobs: jobs.drain(window).collect(),
        page_bar,
    })
}

/// Both flow URLs are needed; with either missing the comparison is empty.
fn comparison(state: &AppState, params: &QueryParams) -> Result<FlowComparison> {
    let (Some(first_url), Some(second_url)) = (
        params.get_trimmed(COMPARE_FLOW_URL1),
        params.get_trimmed(COMPARE_FLOW_URL2),
    ) else {
        return Ok(FlowComparison::default());
    };
    let first = state.store.fetch_by_flow_exec_url(first_url)?;
    let second = state.store.fetch_by_flow_exec_url(second_url)?;
    Ok(compare_flows(first_url, first, second_url, second))
}

fn required<'a>(params: &'a QueryParams, name: &'static str) -> Result<&'a str> {
    params
        .get_trimmed(name)
        .ok_or(Error::MissingParameter(name))
}

fn non_empty_groups(
    jobs: Vec<JobAnalysis>,
    not_found: String,
) -> Result<BTreeMap<String, Vec<JobAnalysis>>> {
    if jobs.is_empty() {
        return Err(Error::NotFound(not_found));
    }
    Ok(group_jobs(jobs, GroupBy::JobExecutionUrl))
}

fn to_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn html_page(views: &Views, result: Result<(StatusCode, String)>) -> Response {
    match result {
        Ok((status, html)) => (status, Html(html)).into_response(),
        Err(err) => {
            let status = err.status();
            match views.message(status.as_u16(), &err.public_message()) {
                Ok(html) => (status, Html(html)).into_response(),
                Err(render_err) => {
                    error!("Failed to render error page: {render_err}");
                    err.into_response()
                }
            }
        }
    }
}
