use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Millisecond timestamps are both the display key and half of the
/// deduplication identity.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub url: String,
    pub content_type: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A single entry in a conversation, to or from the agent
pub struct Message {
    /// May be empty for a pure-attachment message
    #[serde(default)]
    pub text: String,
    pub sender: Sender,
    /// Milliseconds since epoch
    #[serde(default)]
    pub created_at: i64,
    /// True only for a speculative placeholder awaiting a reply. Never
    /// persisted and never sent over the wire.
    #[serde(skip_serializing, default)]
    pub is_pending: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Classification tag echoed by the agent, display-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Message {
    /// Create a new user message with the current timestamp
    pub fn user<S: Into<String>>(text: S) -> Self {
        Message {
            text: text.into(),
            sender: Sender::User,
            created_at: now_millis(),
            is_pending: false,
            attachments: Vec::new(),
            source: None,
            action: None,
        }
    }

    /// Create a new agent message with the current timestamp
    pub fn agent<S: Into<String>>(text: S) -> Self {
        Message {
            sender: Sender::Agent,
            ..Message::user(text)
        }
    }

    /// Create a speculative agent reply awaiting resolution
    pub fn pending_placeholder<S: Into<String>>(text: S) -> Self {
        Message {
            is_pending: true,
            ..Message::agent(text)
        }
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The deduplication identity. The remote source and the local store do
    /// not share an ID space, so this triple is the only stable key a
    /// message has.
    pub fn identity(&self) -> (i64, Sender, &str) {
        (self.created_at, self.sender, &self.text)
    }
}
