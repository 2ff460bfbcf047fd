//! Grouping of job analyses by execution or definition URL.

use std::collections::BTreeMap;

use jobsight_models::job::job_result::JobAnalysis;
use serde::Serialize;

/// Key used to partition a list of jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    JobExecutionUrl,
    JobDefinitionUrl,
}

impl GroupBy {
    pub fn key<'a>(&self, analysis: &'a JobAnalysis) -> &'a str {
        match self {
            GroupBy::JobExecutionUrl => &analysis.job.job_exec_url,
            GroupBy::JobDefinitionUrl => &analysis.job.job_url,
        }
    }
}

/// Partitions `jobs` by `group_by`, keeping their relative order inside
/// each group.
pub fn group_jobs(jobs: Vec<JobAnalysis>, group_by: GroupBy) -> BTreeMap<String, Vec<JobAnalysis>> {
    let mut groups: BTreeMap<String, Vec<JobAnalysis>> = BTreeMap::new();
    for job in jobs {
        groups
            .entry(group_by.key(&job).to_string())
            .or_default()
            .push(job);
    }
    groups
}

/// The executions of one job definition in each of the compared flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobComparison {
    pub job_url: String,
    pub first: Vec<JobAnalysis>,
    pub second: Vec<JobAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowComparison {
    pub first_flow_exec_url: String,
    pub second_flow_exec_url: String,
    pub jobs: Vec<JobComparison>,
}

impl FlowComparison {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Pairs the jobs of two flow executions by job definition URL.
///
/// Definitions present in both flows come first, then those only in the
/// first flow, then those only in the second. Each section is sorted.
pub fn compare_flows(
    first_url: &str,
    first: Vec<JobAnalysis>,
    second_url: &str,
    second: Vec<JobAnalysis>,
) -> FlowComparison {
    let mut first = group_jobs(first, GroupBy::JobDefinitionUrl);
    let mut second = group_jobs(second, GroupBy::JobDefinitionUrl);

    let common: Vec<String> = first
        .keys()
        .filter(|key| second.contains_key(*key))
        .cloned()
        .collect();

    let mut jobs = Vec::with_capacity(first.len() + second.len() - common.len());
    for job_url in common {
        let first = first.remove(&job_url).unwrap_or_default();
        let second = second.remove(&job_url).unwrap_or_default();
        jobs.push(JobComparison {
            job_url,
            first,
            second,
        });
    }
    jobs.extend(first.into_iter().map(|(job_url, first)| JobComparison {
        job_url,
        first,
        second: Vec::new(),
    }));
    jobs.extend(second.into_iter().map(|(job_url, second)| JobComparison {
        job_url,
        first: Vec::new(),
        second,
    }));

    FlowComparison {
        first_flow_exec_url: first_url.to_string(),
        second_flow_exec_url: second_url.to_string(),
        jobs,
    }
}
