use crate::ids::{MarkId, VideoId};
use crate::mark::Mark;
use crate::tracking::{Tracking, sanitize_seconds};

/// Everything persisted about one video.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoRecord {
    pub id: VideoId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    /// Persisted as `time`, with `-1` for [`Tracking::Removed`].
    #[cfg_attr(feature = "serde", serde(rename = "time"))]
    pub tracking: Tracking,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            serialize_with = "crate::tracking::seconds::serialize"
        )
    )]
    pub duration: f64,
    /// Marks in insertion order, which is also display order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamps: Vec<Mark>,
}

impl VideoRecord {
    /// A tracked video with no marks.
    pub fn tracked(
        id: VideoId,
        title: impl Into<String>,
        position: f64,
        duration: f64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            tracking: Tracking::active(position),
            duration: sanitize_seconds(duration),
            timestamps: Vec::new(),
        }
    }

    /// Placeholder for a video that gets marked without being tracked.
    pub fn mark_holder(id: VideoId, duration: f64) -> Self {
        Self {
            id,
            title: String::new(),
            tracking: Tracking::Removed,
            duration: sanitize_seconds(duration),
            timestamps: Vec::new(),
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking.is_active()
    }

    pub fn has_marks(&self) -> bool {
        !self.timestamps.is_empty()
    }

    /// Soft-deleted and holding no marks: nothing left worth keeping.
    pub fn is_prunable(&self) -> bool {
        self.tracking.is_removed() && self.timestamps.is_empty()
    }

    pub fn position_of_mark(&self, id: &MarkId) -> Option<usize> {
        self.timestamps
            .iter()
            .position(|mark| mark.id.as_ref() == Some(id))
    }

    pub fn position_of_moment(&self, title: &str, time: f64) -> Option<usize> {
        self.timestamps
            .iter()
            .position(|mark| mark.same_moment(title, time))
    }

    pub fn position_of_time(&self, time: f64) -> Option<usize> {
        self.timestamps.iter().position(|mark| mark.time == time)
    }
}
