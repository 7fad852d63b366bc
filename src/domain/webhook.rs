use serde::Deserialize;

/// Event discriminator the scanner sends when a vulnerability is fixed.
pub const ISSUE_FIXED_EVENT: &str = "issue.fixed";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: Option<WebhookEventData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventData {
    #[serde(default)]
    pub issue_id: Option<String>,
}

impl WebhookEvent {
    pub fn is_issue_fixed(&self) -> bool {
        self.event == ISSUE_FIXED_EVENT
    }

    pub fn issue_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.issue_id.as_deref())
    }
}
