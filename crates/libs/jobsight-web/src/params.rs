//! Request parameter parsing.
//!
//! Malformed optional values never fail a request: they are logged and the
//! corresponding filter or setting falls back to its default.

use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use jobsight_models::job::filter::JobResultFilter;
use jobsight_models::job::severity::Severity;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::error;

pub const PAGE: &str = "page";
pub const JOB_ID: &str = "jobid";
pub const FLOW_URL: &str = "flowurl";
pub const USER: &str = "user";
pub const SEVERITY: &str = "severity";
pub const JOB_TYPE: &str = "jobtype";
pub const ANALYSIS: &str = "analysis";
pub const START_DATE: &str = "start-date";
pub const END_DATE: &str = "end-date";
pub const COMPARE_FLOW_URL1: &str = "flowurl1";
pub const COMPARE_FLOW_URL2: &str = "flowurl2";
pub const TOPIC: &str = "topic";
pub const JOB_URL: &str = "job";
pub const FLOW_EXEC_URL: &str = "flowexec";
pub const ID: &str = "id";

/// Search form fields echoed back into the search page.
pub const SEARCH_FIELDS: [&str; 8] = [
    JOB_ID, FLOW_URL, USER, SEVERITY, JOB_TYPE, ANALYSIS, START_DATE, END_DATE,
];

const DATE_FORMAT: &str = "%m/%d/%Y";

// Unreserved characters stay readable in regenerated links.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query parameters in request order. Lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl From<Vec<(String, String)>> for QueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// The trimmed value, or `None` when missing or blank.
    pub fn get_trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }

    /// Requested page number, 1 when missing or not a positive integer.
    pub fn page(&self) -> usize {
        let Some(raw) = self.get(PAGE) else {
            return 1;
        };
        match raw.trim().parse::<i64>() {
            Ok(page) if page >= 1 => usize::try_from(page).unwrap_or(1),
            Ok(_) => 1,
            Err(_) => {
                error!("Error parsing page number '{raw}'. Setting current page to 1.");
                1
            }
        }
    }

    /// Builds the search predicates from the filter parameters.
    pub fn filter(&self) -> JobResultFilter {
        JobResultFilter {
            username: self.get_trimmed(USER).map(str::to_lowercase),
            job_type: self.get_trimmed(JOB_TYPE).map(str::to_string),
            severity: self.get_trimmed(SEVERITY).and_then(|raw| {
                raw.parse::<Severity>()
                    .inspect_err(|err| error!("{err}. Severity filter not applied."))
                    .ok()
            }),
            analysis: self.get_trimmed(ANALYSIS).map(str::to_string),
            analyzed_after: self
                .get_trimmed(START_DATE)
                .and_then(|raw| date_filter(START_DATE, raw))
                .map(start_of_day),
            analyzed_before: self
                .get_trimmed(END_DATE)
                .and_then(|raw| date_filter(END_DATE, raw))
                .and_then(|date| date.checked_add_days(Days::new(1)))
                .map(start_of_day),
        }
    }

    /// Every parameter except `page`, url-encoded, for page-bar links.
    pub fn query_string_without_page(&self) -> Option<String> {
        let mut seen = HashSet::new();
        let encoded: Vec<String> = self
            .0
            .iter()
            .filter(|(key, _)| key != PAGE && seen.insert(key.as_str()))
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_VALUE),
                    utf8_percent_encode(value, QUERY_VALUE)
                )
            })
            .collect();
        if encoded.is_empty() {
            None
        } else {
            Some(encoded.join("&"))
        }
    }
}

/// Parses a `MM/dd/yyyy` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn date_filter(name: &str, raw: &str) -> Option<NaiveDate> {
    let date = parse_date(raw);
    if date.is_none() {
        error!("Error while parsing {name}. {raw} is an invalid date. Filter not applied.");
    }
    date
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
