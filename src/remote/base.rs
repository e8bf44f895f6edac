use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::SyncResult;
use crate::models::message::{Attachment, Message};

/// Boundary to the agent server: canonical history and message delivery.
///
/// Failures are distinguishable from empty successes; the engine degrades to
/// its local view on `RemoteUnavailable` and rolls back an optimistic send on
/// `SendFailed`.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Fetch the server's canonical message list for a conversation
    async fn fetch_messages(&self, agent_id: &Uuid) -> SyncResult<Vec<Message>>;

    /// Deliver one user message; a success carries one or more reply messages
    async fn send_message(
        &self,
        agent_id: &Uuid,
        text: &str,
        attachment: Option<Attachment>,
    ) -> SyncResult<Vec<Message>>;
}
