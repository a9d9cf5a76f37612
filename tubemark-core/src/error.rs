use thiserror::Error;
use tubemark_contracts::{CommandKind, ContractError};
use tubemark_model::VideoId;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("{command} failed: no record for video '{id}'")]
    MissingRecord { command: CommandKind, id: VideoId },

    #[error("unknown command type `{0}`")]
    UnknownCommand(String),

    #[error("invalid command: {0}")]
    MalformedCommand(#[source] ContractError),

    #[error("stored library under '{key}' is corrupt: {source}")]
    CorruptState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("video store worker is not running")]
    QueueClosed,
}

impl StoreError {
    pub fn missing(command: CommandKind, id: &VideoId) -> Self {
        StoreError::MissingRecord {
            command,
            id: id.clone(),
        }
    }
}

impl From<ContractError> for StoreError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::UnknownCommand(kind) => {
                StoreError::UnknownCommand(kind)
            }
            other => StoreError::MalformedCommand(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
