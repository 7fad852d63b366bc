use async_trait::async_trait;
use tracing::info;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::services::{SyncSlot, SyncTrigger, TriggerOutcome};
use crate::workflow::sync;

/// Runs each sync on the receiver's own runtime.
pub struct TaskSyncTrigger {
    ctx: AppContext,
    slot: SyncSlot,
}

impl TaskSyncTrigger {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            slot: SyncSlot::new(),
        }
    }
}

#[async_trait]
impl SyncTrigger for TaskSyncTrigger {
    async fn trigger(&self) -> AppResult<TriggerOutcome> {
        let Some(mut permit) = self.slot.try_claim() else {
            info!("Sync task already running; queued one more run");
            return Ok(TriggerOutcome::AlreadyRunning);
        };

        let ctx = self.ctx.clone();
        let slot = self.slot.clone();
        tokio::spawn(async move {
            loop {
                let report = sync::run(&ctx).await;
                sync::log_summary(&report);
                match slot.finish(permit) {
                    Some(next) => {
                        info!("Webhooks arrived during the sync; running again");
                        permit = next;
                    }
                    None => break,
                }
            }
        });

        Ok(TriggerOutcome::Started)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::issue::ResolvedIssue;
    use crate::domain::transition::Transition;
    use crate::services::{IssueTrackerService, VulnerabilityScannerService};

    struct GatedScanner {
        gate: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VulnerabilityScannerService for GatedScanner {
        async fn fetch_resolved_issues(&self) -> AppResult<Vec<ResolvedIssue>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(Vec::new())
        }
    }

    struct IdleTracker;

    #[async_trait]
    impl IssueTrackerService for IdleTracker {
        async fn list_transitions(&self, _ticket_key: &str) -> AppResult<Vec<Transition>> {
            Ok(Vec::new())
        }

        async fn apply_transition(&self, _ticket_key: &str, _transition_id: &str) -> AppResult<()> {
            Ok(())
        }
    }

    /// Reports whatever issues are currently staged.
    #[derive(Default)]
    struct StagedScanner {
        issues: Mutex<Vec<ResolvedIssue>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VulnerabilityScannerService for StagedScanner {
        async fn fetch_resolved_issues(&self) -> AppResult<Vec<ResolvedIssue>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.issues.lock().unwrap().clone())
        }
    }

    /// Holds the lookup of one ticket until released.
    struct HoldingTracker {
        held_key: &'static str,
        release: Arc<Notify>,
        lookups: Mutex<Vec<String>>,
        applied: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IssueTrackerService for HoldingTracker {
        async fn list_transitions(&self, ticket_key: &str) -> AppResult<Vec<Transition>> {
            self.lookups.lock().unwrap().push(ticket_key.to_string());
            if ticket_key == self.held_key {
                self.release.notified().await;
            }
            Ok(vec![Transition {
                id: "31".to_string(),
                name: "Done".to_string(),
            }])
        }

        async fn apply_transition(&self, ticket_key: &str, _transition_id: &str) -> AppResult<()> {
            self.applied.lock().unwrap().push(ticket_key.to_string());
            Ok(())
        }
    }

    async fn wait_for(mut condition: impl FnMut() -> bool, what: &str) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {what}");
    }

    fn config() -> Arc<AppConfig> {
        Arc::new(AppConfig::from_lookup(|_| None).unwrap())
    }

    #[tokio::test]
    async fn triggers_during_a_run_collapse_into_one_rerun() {
        let gate = Arc::new(Notify::new());
        let scanner = Arc::new(GatedScanner {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
        });
        let ctx = AppContext::new(config(), scanner.clone(), Arc::new(IdleTracker));
        let trigger = TaskSyncTrigger::new(ctx);

        assert_eq!(trigger.trigger().await.unwrap(), TriggerOutcome::Started);
        assert_eq!(
            trigger.trigger().await.unwrap(),
            TriggerOutcome::AlreadyRunning
        );
        assert_eq!(
            trigger.trigger().await.unwrap(),
            TriggerOutcome::AlreadyRunning
        );

        gate.notify_one();
        wait_for(|| scanner.calls.load(Ordering::SeqCst) == 2, "the rerun").await;
        gate.notify_one();
        wait_for(|| !trigger.slot.is_busy(), "the slot to free up").await;

        assert_eq!(scanner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fix_reported_mid_run_is_closed_by_the_rerun() {
        let scanner = Arc::new(StagedScanner::default());
        *scanner.issues.lock().unwrap() =
            vec![ResolvedIssue::new("A", Some("PROJ-1".to_string()))];
        let release = Arc::new(Notify::new());
        let tracker = Arc::new(HoldingTracker {
            held_key: "PROJ-1",
            release: release.clone(),
            lookups: Mutex::new(Vec::new()),
            applied: Mutex::new(Vec::new()),
        });
        let ctx = AppContext::new(config(), scanner.clone(), tracker.clone());
        let trigger = TaskSyncTrigger::new(ctx);

        assert_eq!(trigger.trigger().await.unwrap(), TriggerOutcome::Started);
        wait_for(
            || tracker.lookups.lock().unwrap().contains(&"PROJ-1".to_string()),
            "the first run to reach PROJ-1",
        )
        .await;

        // The first run has already fetched; PROJ-2 is fixed afterwards.
        *scanner.issues.lock().unwrap() =
            vec![ResolvedIssue::new("B", Some("PROJ-2".to_string()))];
        assert_eq!(
            trigger.trigger().await.unwrap(),
            TriggerOutcome::AlreadyRunning
        );

        release.notify_one();
        wait_for(|| !trigger.slot.is_busy(), "the slot to free up").await;

        assert_eq!(scanner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *tracker.applied.lock().unwrap(),
            vec!["PROJ-1".to_string(), "PROJ-2".to_string()]
        );
    }
}
