use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, VulnerabilityScannerService};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub scanner: Arc<dyn VulnerabilityScannerService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(
        config: Arc<AppConfig>,
        scanner: Arc<dyn VulnerabilityScannerService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            config,
            scanner,
            issue_tracker,
        }
    }
}
