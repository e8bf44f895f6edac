use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum SyncError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Remote history unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Unable to send message: {0}")]
    SendFailed(String),

    #[error("A send is already in flight for this conversation")]
    SendInFlight,

    #[error("Message text is empty")]
    EmptyMessage,
}

pub type SyncResult<T> = Result<T, SyncError>;
