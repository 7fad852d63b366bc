use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    /// A sync was already in flight; it runs once more after finishing.
    AlreadyRunning,
}

/// Starts a sync run without waiting for it to finish.
#[async_trait]
pub trait SyncTrigger: Send + Sync {
    async fn trigger(&self) -> AppResult<TriggerOutcome>;
}

/// Single-slot guard limiting the receiver to one sync run at a time.
///
/// A claim that finds the slot busy marks a rerun as pending. The holder
/// hands its permit to [`SyncSlot::finish`] when done, which keeps the slot
/// for one more run while a rerun is pending. Any number of busy claims
/// collapse into a single rerun.
#[derive(Debug, Clone)]
pub struct SyncSlot {
    permits: Arc<Semaphore>,
    rerun: Arc<AtomicBool>,
}

impl Default for SyncSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncSlot {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
            rerun: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The slot is released when the returned permit drops.
    pub fn try_claim(&self) -> Option<OwnedSemaphorePermit> {
        // Flag first: a holder that misses it is guaranteed to see it after releasing.
        self.rerun.store(true, Ordering::SeqCst);
        let permit = self.permits.clone().try_acquire_owned().ok()?;
        self.rerun.store(false, Ordering::SeqCst);
        Some(permit)
    }

    /// Returns the permit back when another run is due, otherwise releases the slot.
    pub fn finish(&self, permit: OwnedSemaphorePermit) -> Option<OwnedSemaphorePermit> {
        if self.rerun.swap(false, Ordering::SeqCst) {
            return Some(permit);
        }
        drop(permit);
        if !self.rerun.load(Ordering::SeqCst) {
            return None;
        }
        let permit = self.permits.clone().try_acquire_owned().ok()?;
        self.rerun.store(false, Ordering::SeqCst);
        Some(permit)
    }

    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_admits_one_claim_at_a_time() {
        let slot = SyncSlot::new();
        let permit = slot.try_claim().expect("first claim");
        assert!(slot.is_busy());
        assert!(slot.clone().try_claim().is_none());
        drop(permit);
        assert!(!slot.is_busy());
        assert!(slot.try_claim().is_some());
    }

    #[test]
    fn finish_releases_when_nothing_is_pending() {
        let slot = SyncSlot::new();
        let permit = slot.try_claim().expect("first claim");
        assert!(slot.finish(permit).is_none());
        assert!(!slot.is_busy());
    }

    #[test]
    fn busy_claims_collapse_into_one_rerun() {
        let slot = SyncSlot::new();
        let permit = slot.try_claim().expect("first claim");
        assert!(slot.try_claim().is_none());
        assert!(slot.try_claim().is_none());

        let permit = slot.finish(permit).expect("rerun keeps the slot");
        assert!(slot.is_busy());

        assert!(slot.finish(permit).is_none());
        assert!(!slot.is_busy());
    }
}
