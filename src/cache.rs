use tokio::sync::watch;

use crate::models::message::Message;

/// Send lifecycle as seen by the presentation layer: `Pending` disables
/// input, `Failed` carries the reason for a dismissible notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SendState {
    Idle,
    Pending,
    Failed(String),
}

/// The observable in-memory representation of one open conversation.
///
/// A thin container: it performs no merging and no persistence. The current
/// sequence is replaced wholesale on each publish from the reconciler or the
/// send controller, and subscribers are notified on every mutation.
#[derive(Debug)]
pub struct ConversationCache {
    messages_tx: watch::Sender<Vec<Message>>,
    status_tx: watch::Sender<SendState>,
}

impl ConversationCache {
    pub fn new() -> Self {
        let (messages_tx, _) = watch::channel(Vec::new());
        let (status_tx, _) = watch::channel(SendState::Idle);
        Self {
            messages_tx,
            status_tx,
        }
    }

    pub fn publish(&self, messages: Vec<Message>) {
        self.messages_tx.send_replace(messages);
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.messages_tx.subscribe()
    }

    pub fn set_status(&self, status: SendState) {
        self.status_tx.send_replace(status);
    }

    pub fn status(&self) -> SendState {
        self.status_tx.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SendState> {
        self.status_tx.subscribe()
    }
}

impl Default for ConversationCache {
    fn default() -> Self {
        Self::new()
    }
}
