//! # Tubemark Core
//!
//! The background data layer behind the Tubemark browser extension: a
//! persisted library of tracked videos and their saved moments, driven by
//! a small set of JSON commands.
//!
//! ## Architecture
//!
//! - [`storage`]: the key-value port ([`StorageArea`]) plus memory and
//!   JSON-file adapters
//! - [`transitions`]: pure per-command state transitions on a
//!   [`VideoLibrary`](tubemark_model::VideoLibrary)
//! - [`service`]: [`VideoStore`], which loads, applies and persists
//! - [`queue`]: [`StoreHandle`], a single-writer worker so concurrent
//!   callers never lose updates
//! - [`tracker`]: [`PlaybackTracker`], the periodic position updater
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use tubemark_core::{MemoryStorage, StoreHandle, VideoStore};
//!
//! # async fn demo() {
//! let store = VideoStore::new(Arc::new(MemoryStorage::new()));
//! let (handle, _worker) = StoreHandle::spawn(store, 16);
//!
//! handle
//!     .dispatch_value(json!({"type": "NEW_VIDEO", "id": "abc", "title": "Talk"}))
//!     .await;
//! let reply = handle
//!     .dispatch_value(json!({"type": "CHECK_VIDEO", "id": "abc"}))
//!     .await;
//! assert!(reply.is_success());
//! # }
//! ```

#![allow(missing_docs)]

pub mod error;
pub mod queue;
pub mod service;
pub mod storage;
pub mod tracker;
pub mod transitions;

pub use error::{Result, StoreError};
pub use queue::StoreHandle;
pub use service::{DEFAULT_LIBRARY_KEY, VideoStore};
pub use storage::{JsonFileStorage, MemoryStorage, StorageArea, StorageError};
pub use tracker::{PlaybackSource, PlaybackTracker, StopReason, TrackerSummary};
