//! HTML rendering with embedded tera templates.

use std::collections::{BTreeMap, HashMap};

use jobsight_models::job::job_result::JobAnalysis;
use jobsight_models::job::severity::Severity;
use serde_json::{Value, json};
use tera::{Context, Tera};

use crate::dashboard::DashboardCounts;
use crate::grouping::FlowComparison;
use crate::help::HelpPages;
use crate::pagination::PageBar;
use crate::params::{QueryParams, SEARCH_FIELDS};
use crate::prelude::*;

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("search.html", include_str!("../templates/search.html")),
    ("jobs.html", include_str!("../templates/jobs.html")),
    ("compare.html", include_str!("../templates/compare.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("help.html", include_str!("../templates/help.html")),
    ("message.html", include_str!("../templates/message.html")),
];

/// What the search page shows below the form.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    /// Lookup by job id. `None` when no job has that id.
    Job(Option<JobAnalysis>),
    /// Jobs of a flow execution, by job execution URL.
    Flow {
        flow_url: String,
        groups: BTreeMap<String, Vec<JobAnalysis>>,
    },
    /// One page of a filtered search.
    Results {
        jobs: Vec<JobAnalysis>,
        page_bar: PageBar,
    },
    Empty,
}

#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        tera.register_filter("severity", severity_filter);
        Ok(Self { tera })
    }

    pub fn search(&self, params: &QueryParams, view: &SearchView) -> Result<String> {
        let mut context = Context::new();
        let search: HashMap<&str, &str> = SEARCH_FIELDS
            .iter()
            .map(|field| (*field, params.get(field).unwrap_or_default()))
            .collect();
        context.insert("search", &search);
        context.insert("severities", &severity_options());

        match view {
            SearchView::Job(Some(job)) => {
                context.insert("view", "job");
                context.insert("job", job);
            }
            SearchView::Job(None) => context.insert("view", "not_found"),
            SearchView::Flow { flow_url, groups } => {
                context.insert("view", "flow");
                context.insert("flow_url", flow_url);
                context.insert("groups", groups);
            }
            SearchView::Results { jobs, page_bar } => {
                context.insert("view", "results");
                context.insert("jobs", jobs);
                context.insert("page_bar", page_bar);
            }
            SearchView::Empty => context.insert("view", "empty"),
        }
        self.render("search.html", &context)
    }

    /// A titled list of jobs grouped by execution URL.
    pub fn grouped_jobs(
        &self,
        title: &str,
        url: &str,
        groups: &BTreeMap<String, Vec<JobAnalysis>>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("url", url);
        context.insert("groups", groups);
        self.render("jobs.html", &context)
    }

    pub fn compare(&self, comparison: &FlowComparison) -> Result<String> {
        let mut context = Context::new();
        context.insert("comparison", comparison);
        self.render("compare.html", &context)
    }

    pub fn dashboard(
        &self,
        counts: &DashboardCounts,
        window_hours: u64,
        latest: &[JobAnalysis],
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("counts", counts);
        context.insert("window_hours", &window_hours);
        context.insert("latest", latest);
        self.render("dashboard.html", &context)
    }

    /// The help page of `topic`, or the topic index when it is unknown.
    pub fn help(&self, pages: &HelpPages, topic: Option<&str>) -> Result<String> {
        let mut context = Context::new();
        let page = topic.and_then(|topic| pages.get(topic).map(|body| (topic, body)));
        match page {
            Some((topic, body)) => {
                context.insert("title", topic);
                context.insert("body", body);
            }
            None => {
                context.insert("title", "Help");
                context.insert("body", &Option::<&str>::None);
            }
        }
        context.insert("topics", &pages.topics().collect::<Vec<_>>());
        self.render("help.html", &context)
    }

    pub fn message(&self, status: u16, message: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("status", &status);
        context.insert("message", message);
        self.render("message.html", &context)
    }

    fn render(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}

fn severity_options() -> Vec<Value> {
    Severity::ALL
        .iter()
        .map(|severity| json!({ "value": severity.value().to_string(), "name": severity.name() }))
        .collect()
}

/// Turns a severity ordinal into its name.
fn severity_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_i64()
        .and_then(|value| i32::try_from(value).ok())
        .and_then(|value| Severity::try_from(value).ok())
        .map_or("Unknown", Severity::name);
    Ok(Value::String(name.to_string()))
}
