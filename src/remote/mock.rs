use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::base::Remote;
use crate::errors::{SyncError, SyncResult};
use crate::models::message::{Attachment, Message};

/// A mock remote that returns pre-configured results for testing.
///
/// Results are consumed in FIFO order; an exhausted history queue yields an
/// empty success while an exhausted reply queue fails the send. Optional
/// gates hold a call open until the test releases it, for exercising
/// interleavings.
#[derive(Default)]
pub struct MockRemote {
    history: Mutex<VecDeque<SyncResult<Vec<Message>>>>,
    replies: Mutex<VecDeque<SyncResult<Vec<Message>>>>,
    sent: Mutex<Vec<(Uuid, String, Option<Attachment>)>>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    send_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_history(&self, result: SyncResult<Vec<Message>>) {
        self.history.lock().unwrap().push_back(result);
    }

    pub fn push_reply(&self, result: SyncResult<Vec<Message>>) {
        self.replies.lock().unwrap().push_back(result);
    }

    /// Hold the next fetches open until the returned gate is notified
    pub fn gate_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Hold the next sends open until the returned gate is notified
    pub fn gate_send(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.send_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Every payload delivered through `send_message`, in order
    pub fn sent(&self) -> Vec<(Uuid, String, Option<Attachment>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Remote for MockRemote {
    async fn fetch_messages(&self, _agent_id: &Uuid) -> SyncResult<Vec<Message>> {
        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.history
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send_message(
        &self,
        agent_id: &Uuid,
        text: &str,
        attachment: Option<Attachment>,
    ) -> SyncResult<Vec<Message>> {
        self.sent
            .lock()
            .unwrap()
            .push((*agent_id, text.to_string(), attachment));

        let gate = self.send_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::SendFailed("no reply configured".to_string())))
    }
}
