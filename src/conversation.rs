use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::{ConversationCache, SendState};
use crate::config::Settings;
use crate::errors::{SyncError, SyncResult};
use crate::models::message::{now_millis, Attachment, Message};
use crate::reconcile::reconcile;
use crate::remote::base::Remote;
use crate::remote::http::HttpRemote;
use crate::store::MessageStore;

/// One addressable message thread between the user and an agent.
///
/// The authoritative sequence lives behind a single lock; every
/// mutate-persist-publish section runs inside it, which serializes store
/// writes per conversation. Network awaits happen outside the lock, so a
/// history fetch and a send can be in flight at the same time; whichever
/// publishes last wins.
pub struct Conversation {
    agent_id: Uuid,
    store: MessageStore,
    remote: Arc<dyn Remote>,
    cache: ConversationCache,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    messages: Vec<Message>,
    send_in_flight: bool,
}

impl Conversation {
    pub fn new(agent_id: Uuid, store: MessageStore, remote: Arc<dyn Remote>) -> Self {
        Self {
            agent_id,
            store,
            remote,
            cache: ConversationCache::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn agent_id(&self) -> Uuid {
        self.agent_id
    }

    /// The current canonical sequence
    pub fn messages(&self) -> Vec<Message> {
        self.cache.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.cache.subscribe()
    }

    pub fn send_state(&self) -> SendState {
        self.cache.status()
    }

    pub fn subscribe_send_state(&self) -> watch::Receiver<SendState> {
        self.cache.subscribe_status()
    }

    /// Reconcile the durable store with the remote history and publish the
    /// canonical sequence.
    ///
    /// When the remote is unavailable the local view is published as-is and
    /// the store is left untouched, so an outage never erases durable
    /// history. The error is returned for an optional soft warning; it is
    /// not a hard failure.
    pub async fn sync(&self) -> SyncResult<Vec<Message>> {
        let fetched = self.remote.fetch_messages(&self.agent_id).await;

        // The local snapshot is taken under the state lock, so a send that
        // lands while the fetch is in flight is not lost from the store.
        let mut state = self.state.lock().await;
        let local = self.store.load(&self.agent_id);
        match fetched {
            Ok(remote) => {
                let merged = reconcile(local, remote);
                state.messages = merged.clone();
                self.store.save(&self.agent_id, &merged);
                self.cache.publish(merged.clone());
                debug!(agent_id = %self.agent_id, count = merged.len(), "reconciled conversation");
                Ok(merged)
            }
            Err(e) => {
                warn!(agent_id = %self.agent_id, error = %e, "remote history unavailable, using local view");
                state.messages = local.clone();
                self.cache.publish(local);
                Err(e)
            }
        }
    }

    /// Optimistic send: the user's message and an agent placeholder appear
    /// immediately, then the placeholder is replaced by the real replies on
    /// success or rolled back on failure. The user's message is persisted up
    /// front so it survives a reload even if the agent never answers.
    ///
    /// At most one send may be in flight per conversation; a second send is
    /// rejected, not queued.
    pub async fn send(
        &self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> SyncResult<Vec<Message>> {
        if text.trim().is_empty() {
            return Err(SyncError::EmptyMessage);
        }

        let submitted_at = now_millis();
        {
            let mut state = self.state.lock().await;
            if state.send_in_flight {
                return Err(SyncError::SendInFlight);
            }
            state.send_in_flight = true;

            let mut user_message = Message::user(text).with_created_at(submitted_at);
            if let Some(attachment) = attachment.clone() {
                user_message = user_message.with_attachment(attachment);
            }
            state.messages.push(user_message);
            state
                .messages
                .push(Message::pending_placeholder(text).with_created_at(submitted_at));

            self.store.save(&self.agent_id, &state.messages);
            self.cache.publish(state.messages.clone());
            self.cache.set_status(SendState::Pending);
        }

        let result = self
            .remote
            .send_message(&self.agent_id, text, attachment)
            .await;

        let mut state = self.state.lock().await;
        state.send_in_flight = false;
        // Remove our own placeholder by flag, not by position: a reconciler
        // publish may have replaced the sequence while the request was in
        // flight.
        state.messages.retain(|m| !m.is_pending);

        match result {
            Ok(replies) => {
                let received_at = now_millis();
                let replies: Vec<Message> = replies
                    .into_iter()
                    .map(|mut m| {
                        m.created_at = received_at;
                        m.is_pending = false;
                        m
                    })
                    .collect();
                state.messages.extend(replies.clone());
                self.store.save(&self.agent_id, &state.messages);
                self.cache.publish(state.messages.clone());
                self.cache.set_status(SendState::Idle);
                debug!(agent_id = %self.agent_id, replies = replies.len(), "send resolved");
                Ok(replies)
            }
            Err(e) => {
                self.store.save(&self.agent_id, &state.messages);
                self.cache.publish(state.messages.clone());
                let reason = match &e {
                    SyncError::SendFailed(reason) => reason.clone(),
                    other => other.to_string(),
                };
                warn!(agent_id = %self.agent_id, error = %e, "send failed, rolled back placeholder");
                self.cache.set_status(SendState::Failed(reason));
                Err(e)
            }
        }
    }

    /// Dismiss a failed-send notification
    pub fn acknowledge_failure(&self) {
        if matches!(self.cache.status(), SendState::Failed(_)) {
            self.cache.set_status(SendState::Idle);
        }
    }
}

/// Registry of open conversations, one engine per agent identifier.
///
/// A conversation is created empty the first time its identifier is opened
/// and lives for the rest of the session.
pub struct Conversations {
    store: MessageStore,
    remote: Arc<dyn Remote>,
    active: Mutex<HashMap<Uuid, Arc<Conversation>>>,
}

impl Conversations {
    pub fn new(store: MessageStore, remote: Arc<dyn Remote>) -> Self {
        Self {
            store,
            remote,
            active: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = MessageStore::new(&settings.storage_dir)?;
        let remote = Arc::new(HttpRemote::new(settings.remote.clone())?);
        Ok(Self::new(store, remote))
    }

    pub async fn open(&self, agent_id: Uuid) -> Arc<Conversation> {
        let mut active = self.active.lock().await;
        Arc::clone(active.entry(agent_id).or_insert_with(|| {
            Arc::new(Conversation::new(
                agent_id,
                self.store.clone(),
                Arc::clone(&self.remote),
            ))
        }))
    }
}
