//! Dashboard summary counts, shared across requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use jobsight_models::job::severity::Severity;
use jobsight_models::store::JobResultStore;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub analyzed: i64,
    pub severe: i64,
    pub critical: i64,
}

/// Counts over a trailing window, recomputed at most once per refresh
/// interval.
#[derive(Debug)]
pub struct DashboardCache {
    refresh_interval: Duration,
    window: Duration,
    cached: Mutex<Option<(Instant, DashboardCounts)>>,
}

impl DashboardCache {
    pub fn new(refresh_interval: Duration, window: Duration) -> Self {
        Self {
            refresh_interval,
            window,
            cached: Mutex::new(None),
        }
    }

    /// Start of the counted window when evaluated at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::from_std(self.window)
            .ok()
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Store queries block, a refresh runs them on the blocking pool.
    pub async fn counts(&self, store: Arc<dyn JobResultStore>) -> Result<DashboardCounts> {
        let mut cached = self.cached.lock().await;
        if let Some((refreshed_at, counts)) = *cached {
            if refreshed_at.elapsed() < self.refresh_interval {
                return Ok(counts);
            }
        }

        let since = self.window_start(Utc::now());
        let counts = tokio::task::spawn_blocking(move || {
            Ok::<_, jobsight_models::error::Error>(DashboardCounts {
                analyzed: store.count_analyzed_since(since, None)?,
                severe: store.count_analyzed_since(since, Some(Severity::Severe))?,
                critical: store.count_analyzed_since(since, Some(Severity::Critical))?,
            })
        })
        .await??;
        debug!("Refreshed dashboard counts {:?}", counts);
        *cached = Some((Instant::now(), counts));
        Ok(counts)
    }
}
