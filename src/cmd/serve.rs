use std::sync::Arc;

use tracing::info;

use crate::config::TriggerMode;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::process::ProcessSyncTrigger;
use crate::infra::task::TaskSyncTrigger;
use crate::server::{self, AppState};
use crate::services::SyncTrigger;

pub async fn run(ctx: AppContext) -> AppResult<()> {
    let secret = ctx.config.require_webhook()?.to_string();

    let trigger: Arc<dyn SyncTrigger> = match ctx.config.trigger_mode {
        TriggerMode::Process => {
            let trigger = ProcessSyncTrigger::new(ctx.config.sync_command.clone())?;
            info!(command = %trigger.command_line(), "Syncs run as child processes");
            Arc::new(trigger)
        }
        TriggerMode::Task => {
            ctx.config.require_sync()?;
            info!("Syncs run as in-process tasks");
            Arc::new(TaskSyncTrigger::new(ctx.clone()))
        }
    };

    server::serve(ctx.config.port, AppState::new(&secret, trigger)).await
}
