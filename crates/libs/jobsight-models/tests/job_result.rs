mod common;

use chrono::Duration;
use common::{DBTestContext, at, heuristic, job};
use jobsight_models::job::filter::JobResultFilter;
use jobsight_models::job::job_result::JobResultDb;
use jobsight_models::job::severity::Severity;
use jobsight_models::store::JobResultStore;
use serial_test::serial;

fn seed(ctx: &DBTestContext) {
    let db = &ctx.connection;
    job("job_1", "Alice", 4, at(1, 10)).save(db).unwrap();
    job("job_2", "bob", 1, at(1, 23)).save(db).unwrap();
    job("job_3", "alice", 2, at(2, 8)).save(db).unwrap();

    heuristic("job_1", "Mapper Skew", 4).save(db).unwrap();
    heuristic("job_1", "Reducer Time", 0).save(db).unwrap();
    heuristic("job_2", "Mapper Skew", 3).save(db).unwrap();
    heuristic("job_3", "Mapper Skew", 1).save(db).unwrap();
}

fn ids(jobs: &[jobsight_models::job::job_result::JobAnalysis]) -> Vec<&str> {
    jobs.iter().map(|job| job.job_id()).collect()
}

#[test]
#[serial]
#[ignore = "requires DATABASE_URL"]
fn fetch_by_id_attaches_heuristics() {
    let ctx = DBTestContext::from_env();
    seed(&ctx);

    let found = JobResultDb::fetch_by_id("job_1", &ctx.connection)
        .unwrap()
        .expect("job_1 exists");
    assert_eq!(found.heuristic_results.len(), 2);
    assert_eq!(found.heuristic_results[0].analysis_name, "Mapper Skew");

    assert!(JobResultDb::fetch_by_id("missing", &ctx.connection)
        .unwrap()
        .is_none());
}

#[test]
#[serial]
#[ignore = "requires DATABASE_URL"]
fn search_orders_newest_first_and_matches_username_case_insensitively() {
    let ctx = DBTestContext::from_env();
    seed(&ctx);

    let all = ctx.connection.search(&JobResultFilter::default(), 0, 100).unwrap();
    assert_eq!(ids(&all), vec!["job_3", "job_2", "job_1"]);

    let filter = JobResultFilter {
        username: Some("alice".into()),
        ..Default::default()
    };
    let alice = ctx.connection.search(&filter, 0, 100).unwrap();
    assert_eq!(ids(&alice), vec!["job_3", "job_1"]);
}

#[test]
#[serial]
#[ignore = "requires DATABASE_URL"]
fn severity_threshold_moves_to_heuristic_with_analysis() {
    let ctx = DBTestContext::from_env();
    seed(&ctx);

    let job_level = JobResultFilter {
        severity: Some(Severity::Moderate),
        ..Default::default()
    };
    assert_eq!(
        ids(&ctx.connection.search(&job_level, 0, 100).unwrap()),
        vec!["job_3", "job_1"]
    );

    let heuristic_level = JobResultFilter {
        severity: Some(Severity::Severe),
        analysis: Some("Mapper Skew".into()),
        ..Default::default()
    };
    assert_eq!(
        ids(&ctx.connection.search(&heuristic_level, 0, 100).unwrap()),
        vec!["job_2", "job_1"]
    );
}

#[test]
#[serial]
#[ignore = "requires DATABASE_URL"]
fn end_bound_includes_the_whole_day() {
    let ctx = DBTestContext::from_env();
    seed(&ctx);

    let filter = JobResultFilter {
        analyzed_before: Some(at(1, 0) + Duration::days(1)),
        ..Default::default()
    };
    assert_eq!(
        ids(&ctx.connection.search(&filter, 0, 100).unwrap()),
        vec!["job_2", "job_1"]
    );
}

#[test]
#[serial]
#[ignore = "requires DATABASE_URL"]
fn pages_are_slices_of_the_full_result() {
    let ctx = DBTestContext::from_env();
    seed(&ctx);

    let all = ctx.connection.search(&JobResultFilter::default(), 0, 100).unwrap();
    let second = ctx.connection.search(&JobResultFilter::default(), 1, 1).unwrap();
    assert_eq!(second, all[1..2].to_vec());
    assert!(ctx
        .connection
        .search(&JobResultFilter::default(), 10, 5)
        .unwrap()
        .is_empty());
}

#[test]
#[serial]
#[ignore = "requires DATABASE_URL"]
fn dashboard_counts_by_exact_severity() {
    let ctx = DBTestContext::from_env();
    seed(&ctx);

    let since = at(1, 0);
    assert_eq!(ctx.connection.count_analyzed_since(since, None).unwrap(), 3);
    assert_eq!(
        ctx.connection
            .count_analyzed_since(since, Some(Severity::Critical))
            .unwrap(),
        1
    );
    let latest = ctx.connection.fetch_latest_since(since, 2).unwrap();
    assert_eq!(ids(&latest), vec!["job_3", "job_2"]);
}
