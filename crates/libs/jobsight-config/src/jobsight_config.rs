//! Service configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prelude::*;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:8080`.
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Result listing sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Jobs per page on the search page.
    pub page_length: usize,
    /// Pages shown in the page bar.
    pub page_bar_length: usize,
    /// Jobs per page on the REST search.
    pub rest_page_length: usize,
    /// Cap on "other executions of this job" and job execution lookups.
    pub other_executions_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_length: 20,
            page_bar_length: 5,
            rest_page_length: 100,
            other_executions_limit: 50,
        }
    }
}

/// Dashboard summary settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Minimum time between two recomputations of the summary counts.
    pub refresh_interval_secs: u64,
    /// How far back the summary looks.
    pub window_hours: u64,
    /// Number of latest analyses listed.
    pub latest_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            window_hours: 24,
            latest_limit: 50,
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_hours.saturating_mul(60 * 60))
    }
}

/// A heuristic with a help page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Display name, also the help topic.
    pub name: String,
    /// HTML fragment describing the heuristic.
    pub help_page: PathBuf,
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsightConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub dashboard: DashboardConfig,
    pub heuristics: Vec<HeuristicConfig>,
}

impl JobsightConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative help page paths are resolved against the file's directory.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", file_path.display());
        let contents = std::fs::read_to_string(file_path)?;
        let mut config = Self::from_toml(&contents)?;
        if let Some(base) = file_path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        let config: Self = toml::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for heuristic in &mut self.heuristics {
            if heuristic.help_page.is_relative() {
                heuristic.help_page = base.join(&heuristic.help_page);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.search.page_length == 0 || self.search.rest_page_length == 0 {
            return Err(Error::Invalid("page lengths must be positive".into()));
        }
        if self.search.page_bar_length < 2 {
            return Err(Error::Invalid(
                "page_bar_length must be at least 2".into(),
            ));
        }
        if let Some(duplicate) = self
            .heuristics
            .iter()
            .enumerate()
            .find(|(i, h)| self.heuristics[..*i].iter().any(|o| o.name == h.name))
            .map(|(_, h)| &h.name)
        {
            return Err(Error::Invalid(format!("heuristic '{duplicate}' listed twice")));
        }
        Ok(())
    }
}
