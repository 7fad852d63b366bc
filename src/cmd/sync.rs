use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::sync::{self, SyncReport};

pub async fn run(ctx: &AppContext) -> AppResult<SyncReport> {
    ctx.config.require_sync()?;
    let report = sync::run(ctx).await;
    sync::log_summary(&report);
    Ok(report)
}
