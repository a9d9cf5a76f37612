//! Key-value persistence the video store runs on.
//!
//! Mirrors the browser's `storage.local` area: whole JSON values are read
//! and written per key, with no transactions across calls.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Value stored under `key`, or `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage document {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode storage document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage rejected the operation: {0}")]
    Rejected(String),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
