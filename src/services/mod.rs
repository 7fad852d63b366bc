pub mod issue_tracker;
pub mod sync_trigger;
pub mod vulnerability_scanner;

pub use issue_tracker::IssueTrackerService;
pub use sync_trigger::{SyncSlot, SyncTrigger, TriggerOutcome};
pub use vulnerability_scanner::VulnerabilityScannerService;
