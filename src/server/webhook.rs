use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, error, info, warn};

use super::AppState;
use super::signature::{self, SIGNATURE_HEADER};
use crate::domain::webhook::WebhookEvent;
use crate::services::TriggerOutcome;

/// Handle incoming Snyk webhooks.
///
/// Every request with a valid signature gets a 200, whatever its event. Only
/// `issue.fixed` starts a sync, and the response never waits for it.
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        warn!("No signature provided");
        return (StatusCode::FORBIDDEN, "Forbidden");
    };

    if !signature::verify(&body, signature, &state.webhook_secret) {
        warn!("Invalid signature");
        return (StatusCode::FORBIDDEN, "Invalid signature");
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "Signed webhook body is not a recognizable event");
            return (StatusCode::OK, "Webhook processed");
        }
    };

    info!(event = %event.event, "Webhook received");

    if event.is_issue_fixed() {
        info!(issue_id = event.issue_id().unwrap_or("unknown"), "Resolved issue detected");
        match state.trigger.trigger().await {
            Ok(TriggerOutcome::Started) => debug!("Sync triggered"),
            Ok(TriggerOutcome::AlreadyRunning) => debug!("Sync in flight; rerun queued"),
            Err(err) => error!(error = %err, "Error triggering sync"),
        }
    } else {
        debug!(event = %event.event, "Ignoring webhook event");
    }

    (StatusCode::OK, "Webhook processed")
}
