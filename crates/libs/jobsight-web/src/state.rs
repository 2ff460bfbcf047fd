use std::sync::Arc;

use jobsight_config::JobsightConfig;
use jobsight_models::store::JobResultStore;

use crate::dashboard::DashboardCache;
use crate::help::HelpPages;
use crate::prelude::*;
use crate::views::Views;

/// Shared state of every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobResultStore>,
    pub views: Arc<Views>,
    pub help: Arc<HelpPages>,
    pub dashboard: Arc<DashboardCache>,
    pub config: Arc<JobsightConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn JobResultStore>,
        help: HelpPages,
        config: JobsightConfig,
    ) -> Result<Self> {
        let dashboard = DashboardCache::new(
            config.dashboard.refresh_interval(),
            config.dashboard.window(),
        );
        Ok(Self {
            store,
            views: Arc::new(Views::new()?),
            help: Arc::new(help),
            dashboard: Arc::new(dashboard),
            config: Arc::new(config),
        })
    }
}
