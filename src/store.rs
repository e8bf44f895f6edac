use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::message::Message;

/// Fixed namespace prefix for conversation keys in the storage directory.
pub const STORAGE_PREFIX: &str = "chat_messages";

/// Durable key-value store for conversation histories, one JSON file per
/// conversation. Loads never fail and saves never propagate: the in-memory
/// sequence stays authoritative for the session either way.
#[derive(Debug, Clone)]
pub struct MessageStore {
    dir: PathBuf,
}

impl MessageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    fn conversation_path(&self, agent_id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}_{}.json", STORAGE_PREFIX, agent_id))
    }

    /// Missing or corrupt data is "no prior state", not an error.
    pub fn load(&self, agent_id: &Uuid) -> Vec<Message> {
        let path = self.conversation_path(agent_id);
        if !path.exists() {
            return Vec::new();
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(agent_id = %agent_id, error = %e, "failed to read conversation, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(agent_id = %agent_id, error = %e, "discarding corrupt conversation data");
                Vec::new()
            }
        }
    }

    /// Pending placeholders are filtered out before writing. A quota or
    /// serialization failure is logged and swallowed.
    pub fn save(&self, agent_id: &Uuid, messages: &[Message]) {
        let persisted: Vec<&Message> = messages.iter().filter(|m| !m.is_pending).collect();
        let json = match serde_json::to_string(&persisted) {
            Ok(json) => json,
            Err(e) => {
                warn!(agent_id = %agent_id, error = %e, "failed to serialize conversation");
                return;
            }
        };
        match fs::write(self.conversation_path(agent_id), json) {
            Ok(()) => {
                debug!(agent_id = %agent_id, count = persisted.len(), "persisted conversation")
            }
            Err(e) => warn!(agent_id = %agent_id, error = %e, "failed to persist conversation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = MessageStore::new(dir.path()).unwrap();
        let agent_id = Uuid::new_v4();

        let messages = vec![Message::user("hi").with_created_at(100)];
        store.save(&agent_id, &messages);

        let loaded = store.load(&agent_id);
        assert_eq!(loaded, messages);
    }

    #[test]
    fn test_load_missing_conversation_is_empty() {
        let dir = tempdir().unwrap();
        let store = MessageStore::new(dir.path()).unwrap();
        assert!(store.load(&Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_load_corrupt_conversation_is_empty() {
        let dir = tempdir().unwrap();
        let store = MessageStore::new(dir.path()).unwrap();
        let agent_id = Uuid::new_v4();

        let path = dir
            .path()
            .join(format!("{}_{}.json", STORAGE_PREFIX, agent_id));
        fs::write(path, "{not json").unwrap();

        assert!(store.load(&agent_id).is_empty());
    }

    #[test]
    fn test_pending_entries_are_not_persisted() {
        let dir = tempdir().unwrap();
        let store = MessageStore::new(dir.path()).unwrap();
        let agent_id = Uuid::new_v4();

        let messages = vec![
            Message::user("hi").with_created_at(100),
            Message::pending_placeholder("hi").with_created_at(100),
        ];
        store.save(&agent_id, &messages);

        let loaded = store.load(&agent_id);
        assert_eq!(loaded.len(), 1);
        assert!(!loaded[0].is_pending);
    }

    #[test]
    fn test_conversations_are_namespaced_by_agent() {
        let dir = tempdir().unwrap();
        let store = MessageStore::new(dir.path()).unwrap();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store.save(&first, &[Message::user("a").with_created_at(1)]);
        store.save(&second, &[Message::user("b").with_created_at(2)]);

        assert_eq!(store.load(&first)[0].text, "a");
        assert_eq!(store.load(&second)[0].text, "b");
    }
}
