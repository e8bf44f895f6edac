use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use super::base::Remote;
use crate::config::RemoteSettings;
use crate::errors::{SyncError, SyncResult};
use crate::models::message::{Attachment, Message};

/// HTTP implementation of the remote boundary.
///
/// Retry and backoff live below this layer; a call either succeeds or
/// surfaces a single distinguishable failure.
pub struct HttpRemote {
    client: Client,
    host: String,
}

impl HttpRemote {
    pub fn new(settings: RemoteSettings) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            host: settings.host.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

/// Pull a human-readable reason out of an error body, which may be JSON
/// shaped as `{"message": ...}` or plain text.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.is_empty() {
        "An error occurred.".to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn fetch_messages(&self, agent_id: &Uuid) -> SyncResult<Vec<Message>> {
        let url = self.url(&format!("/agents/{}/messages", agent_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json()
                .await
                .map_err(|e| SyncError::RemoteUnavailable(e.to_string())),
            status => Err(SyncError::RemoteUnavailable(format!(
                "history fetch returned {}",
                status
            ))),
        }
    }

    async fn send_message(
        &self,
        agent_id: &Uuid,
        text: &str,
        attachment: Option<Attachment>,
    ) -> SyncResult<Vec<Message>> {
        let url = self.url(&format!("/{}/message", agent_id));
        let mut payload = json!({
            "text": text,
            "user": "user",
        });
        if let Some(attachment) = attachment {
            payload
                .as_object_mut()
                .unwrap()
                .insert("attachment".to_string(), json!(attachment));
        }

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| SyncError::SendFailed(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SyncError::SendFailed(error_message(&body)))
        }
    }
}
