/// A vulnerability the scanner reports as fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIssue {
    pub id: String,
    pub ticket_key: Option<String>,
}

impl ResolvedIssue {
    pub fn new(id: impl Into<String>, ticket_key: Option<String>) -> Self {
        let ticket_key = ticket_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            id: id.into(),
            ticket_key,
        }
    }

    pub fn linked_ticket(&self) -> Option<&str> {
        self.ticket_key.as_deref()
    }
}
