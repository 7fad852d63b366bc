use async_trait::async_trait;

use crate::domain::issue::ResolvedIssue;
use crate::error::AppResult;

#[async_trait]
pub trait VulnerabilityScannerService: Send + Sync {
    async fn fetch_resolved_issues(&self) -> AppResult<Vec<ResolvedIssue>>;
}
