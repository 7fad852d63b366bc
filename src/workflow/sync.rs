use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::issue::ResolvedIssue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed { transition_id: String },
    NoQualifyingTransition,
    Failed,
}

/// Tally of one sync run. Informational only; a run never fails as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub issues_seen: usize,
    pub closed: usize,
    pub no_transition: usize,
    pub unlinked: usize,
    pub failed: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: &CloseOutcome) {
        match outcome {
            CloseOutcome::Closed { .. } => self.closed += 1,
            CloseOutcome::NoQualifyingTransition => self.no_transition += 1,
            CloseOutcome::Failed => self.failed += 1,
        }
    }
}

pub fn log_summary(report: &SyncReport) {
    info!(
        issues = report.issues_seen,
        closed = report.closed,
        no_transition = report.no_transition,
        unlinked = report.unlinked,
        failed = report.failed,
        "Snyk to Jira sync finished"
    );
}

/// Scanner failures are logged and read as "nothing to sync".
pub async fn fetch_resolved_issues(ctx: &AppContext) -> Vec<ResolvedIssue> {
    match ctx.scanner.fetch_resolved_issues().await {
        Ok(issues) => issues,
        Err(err) => {
            error!(error = %err, "Error fetching resolved issues from Snyk");
            Vec::new()
        }
    }
}

pub async fn close_ticket(ctx: &AppContext, ticket_key: &str) -> CloseOutcome {
    let transitions = match ctx.issue_tracker.list_transitions(ticket_key).await {
        Ok(transitions) => transitions,
        Err(err) => {
            error!(ticket_key, error = %err, "Failed to look up Jira transitions");
            return CloseOutcome::Failed;
        }
    };

    let Some(transition) = ctx.config.transition_matcher.select(&transitions) else {
        warn!(
            ticket_key,
            accepted = ?ctx.config.transition_matcher.names(),
            "No valid transition found for Jira ticket"
        );
        return CloseOutcome::NoQualifyingTransition;
    };

    if let Err(err) = ctx
        .issue_tracker
        .apply_transition(ticket_key, &transition.id)
        .await
    {
        error!(
            ticket_key,
            transition_id = %transition.id,
            error = %err,
            "Failed to close Jira ticket"
        );
        return CloseOutcome::Failed;
    }

    info!(
        ticket_key,
        transition_id = %transition.id,
        transition = %transition.name,
        "Jira ticket closed"
    );
    CloseOutcome::Closed {
        transition_id: transition.id.clone(),
    }
}

/// Closes the linked ticket of every resolved issue, one at a time.
pub async fn run(ctx: &AppContext) -> SyncReport {
    let issues = fetch_resolved_issues(ctx).await;
    let mut report = SyncReport {
        issues_seen: issues.len(),
        ..SyncReport::default()
    };

    for issue in &issues {
        match issue.linked_ticket() {
            Some(ticket_key) => {
                info!(
                    issue_id = %issue.id,
                    ticket_key,
                    "Closing Jira ticket for resolved Snyk issue"
                );
                let outcome = close_ticket(ctx, ticket_key).await;
                report.record(&outcome);
            }
            None => {
                info!(issue_id = %issue.id, "Snyk issue has no linked Jira ticket");
                report.unlinked += 1;
            }
        }
    }

    report
}
