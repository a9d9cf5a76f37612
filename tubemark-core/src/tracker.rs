//! Periodic position reporting for the video currently playing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tubemark_contracts::Command;
use tubemark_model::VideoId;

use crate::error::StoreError;
use crate::queue::StoreHandle;

/// Where the tracker reads the player's position from.
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    /// Current offset in seconds, or `None` once the player is gone.
    async fn current_time(&self) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    SourceGone,
    /// The record was hard-deleted while being tracked.
    RecordDeleted,
    StoreClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSummary {
    pub updates: u64,
    /// Ticks where the position had not moved.
    pub skipped: u64,
    pub failures: u64,
    pub stop: StopReason,
}

/// Sends `UPDATE_VIDEO` for one video every `interval`.
///
/// Each update is awaited before the next tick, so at most one is in
/// flight; ticks missed meanwhile are dropped.
#[derive(Debug)]
pub struct PlaybackTracker {
    handle: StoreHandle,
    video_id: VideoId,
    interval: Duration,
    cancel: CancellationToken,
}

impl PlaybackTracker {
    pub fn new(handle: StoreHandle, video_id: VideoId, interval: Duration) -> Self {
        Self {
            handle,
            video_id,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the tracker at its next tick.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn spawn(
        self,
        source: Arc<dyn PlaybackSource>,
    ) -> JoinHandle<TrackerSummary> {
        tokio::spawn(async move { self.run(source.as_ref()).await })
    }

    pub async fn run(self, source: &dyn PlaybackSource) -> TrackerSummary {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last_sent: Option<f64> = None;
        let mut summary = TrackerSummary {
            updates: 0,
            skipped: 0,
            failures: 0,
            stop: StopReason::Cancelled,
        };

        info!(video_id = %self.video_id, interval = ?self.interval, "tracking playback");

        let stop = loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break StopReason::Cancelled,
                _ = ticker.tick() => {}
            }

            let Some(time) = source.current_time().await else {
                break StopReason::SourceGone;
            };
            if last_sent == Some(time) {
                summary.skipped += 1;
                continue;
            }

            let command = Command::update_video(self.video_id.clone(), time);
            match self.handle.execute(command).await {
                Ok(_) => {
                    summary.updates += 1;
                    last_sent = Some(time);
                }
                Err(StoreError::MissingRecord { .. }) => {
                    break StopReason::RecordDeleted;
                }
                Err(StoreError::QueueClosed) => break StopReason::StoreClosed,
                Err(error) => {
                    summary.failures += 1;
                    warn!(video_id = %self.video_id, %error, "position update failed");
                }
            }
        };
        summary.stop = stop;

        debug!(
            video_id = %self.video_id,
            updates = summary.updates,
            skipped = summary.skipped,
            stop = ?summary.stop,
            "tracker stopped"
        );
        summary
    }
}
