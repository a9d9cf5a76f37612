//! Read models handed to the popup for rendering.

use serde::{Deserialize, Serialize};
use tubemark_model::{
    Mark, MarkId, VideoId, VideoLibrary, VideoRecord, progress_percent,
    thumbnail_url, time_label, watch_url,
};

/// Payload of a successful `CHECK_VIDEO`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackPosition {
    #[serde(serialize_with = "tubemark_model::tracking::seconds::serialize")]
    pub time: f64,
}

/// A tracked video, ready to draw as a progress tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTile {
    pub id: VideoId,
    pub title: String,
    pub time: f64,
    pub duration: f64,
    pub progress: f64,
    pub time_label: String,
    pub watch_url: String,
    pub thumbnail_url: String,
}

impl VideoTile {
    /// `None` for soft-deleted records; they only show up through marks.
    pub fn from_record(record: &VideoRecord) -> Option<Self> {
        let time = record.tracking.position()?;
        Some(Self {
            id: record.id.clone(),
            title: record.title.clone(),
            time,
            duration: record.duration,
            progress: progress_percent(record.tracking, record.duration),
            time_label: time_label(time),
            watch_url: watch_url(&record.id, time),
            thumbnail_url: thumbnail_url(&record.id),
        })
    }
}

/// One saved moment together with the video it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkTile {
    pub video_id: VideoId,
    pub video_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_id: Option<MarkId>,
    pub title: String,
    pub time: f64,
    pub duration: f64,
    pub time_label: String,
    pub watch_url: String,
    pub thumbnail_url: String,
}

impl MarkTile {
    pub fn new(record: &VideoRecord, mark: &Mark) -> Self {
        Self {
            video_id: record.id.clone(),
            video_title: record.title.clone(),
            mark_id: mark.id,
            title: mark.title.clone(),
            time: mark.time,
            duration: record.duration,
            time_label: time_label(mark.time),
            watch_url: watch_url(&record.id, mark.time),
            thumbnail_url: thumbnail_url(&record.id),
        }
    }
}

/// Payload of `LIST_VIDEOS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryOverview {
    pub videos: Vec<VideoTile>,
    pub marks: Vec<MarkTile>,
}

impl LibraryOverview {
    pub fn from_library(library: &VideoLibrary) -> Self {
        Self {
            videos: library.iter().filter_map(VideoTile::from_record).collect(),
            marks: library
                .marked_moments()
                .map(|(record, mark)| MarkTile::new(record, mark))
                .collect(),
        }
    }
}
