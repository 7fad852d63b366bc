use async_trait::async_trait;

use crate::domain::transition::Transition;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Transitions valid from the ticket's current workflow state.
    async fn list_transitions(&self, ticket_key: &str) -> AppResult<Vec<Transition>>;
    async fn apply_transition(&self, ticket_key: &str, transition_id: &str) -> AppResult<()>;
}
