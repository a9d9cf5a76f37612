use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Value, json};
use tubemark_core::{
    MemoryStorage, PlaybackSource, PlaybackTracker, StopReason, StorageArea,
    StorageError, StoreHandle, VideoStore,
};
use tubemark_model::VideoId;

/// Memory storage whose reads yield long enough for callers to interleave.
#[derive(Debug, Default)]
struct SlowStorage {
    inner: MemoryStorage,
}

#[async_trait]
impl StorageArea for SlowStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let value = self.inner.get(key).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        value
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }
}

struct ScriptedSource {
    samples: Mutex<VecDeque<f64>>,
}

impl ScriptedSource {
    fn new(samples: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            samples: Mutex::new(samples.iter().copied().collect()),
        })
    }
}

#[async_trait]
impl PlaybackSource for ScriptedSource {
    async fn current_time(&self) -> Option<f64> {
        self.samples.lock().unwrap().pop_front()
    }
}

fn spawn_handle(storage: Arc<dyn StorageArea>) -> StoreHandle {
    let (handle, _worker) = StoreHandle::spawn(VideoStore::new(storage), 8);
    handle
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_marks_through_handle_are_all_kept() {
    let storage = Arc::new(SlowStorage::default());
    let handle = spawn_handle(storage.clone());

    let replies = join_all((0..50).map(|i| {
        let handle = handle.clone();
        tokio::spawn(async move {
            handle
                .dispatch_value(json!({
                    "type": "MARK_VIDEO",
                    "id": "busy",
                    "title": format!("mark {i}"),
                    "time": i
                }))
                .await
        })
    }))
    .await;
    for reply in replies {
        assert!(reply.unwrap().is_success());
    }

    let videos = storage.inner.snapshot("videos").await.unwrap();
    assert_eq!(videos["busy"]["timestamps"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn tracker_skips_unchanged_positions_and_stops_with_source() {
    let handle = spawn_handle(Arc::new(MemoryStorage::new()));
    handle
        .dispatch_value(json!({"type": "NEW_VIDEO", "id": "v", "title": "T"}))
        .await;

    let tracker = PlaybackTracker::new(
        handle.clone(),
        VideoId::new("v").unwrap(),
        Duration::from_millis(5),
    );
    let summary = tracker
        .spawn(ScriptedSource::new(&[10.0, 10.0, 12.0]))
        .await
        .unwrap();

    assert_eq!(summary.updates, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.stop, StopReason::SourceGone);

    let reply = handle
        .dispatch_value(json!({"type": "CHECK_VIDEO", "id": "v"}))
        .await;
    assert_eq!(reply.data(), Some(&json!({"time": 12})));
}

#[tokio::test]
async fn tracker_stops_when_record_is_gone() {
    let handle = spawn_handle(Arc::new(MemoryStorage::new()));
    let tracker = PlaybackTracker::new(
        handle,
        VideoId::new("deleted").unwrap(),
        Duration::from_millis(5),
    );

    let summary = tracker
        .spawn(ScriptedSource::new(&[1.0, 2.0, 3.0]))
        .await
        .unwrap();
    assert_eq!(summary.updates, 0);
    assert_eq!(summary.stop, StopReason::RecordDeleted);
}

#[tokio::test]
async fn cancelled_tracker_sends_nothing() {
    let storage = Arc::new(MemoryStorage::new());
    let handle = spawn_handle(storage.clone());
    handle
        .dispatch_value(json!({"type": "NEW_VIDEO", "id": "v", "title": "T", "time": 4}))
        .await;

    let tracker = PlaybackTracker::new(
        handle,
        VideoId::new("v").unwrap(),
        Duration::from_millis(5),
    );
    tracker.cancellation_token().cancel();

    let summary = tracker.spawn(ScriptedSource::new(&[99.0])).await.unwrap();
    assert_eq!(summary.updates, 0);
    assert_eq!(summary.stop, StopReason::Cancelled);

    let videos = storage.snapshot("videos").await.unwrap();
    assert_eq!(videos["v"]["time"], 4);
}
