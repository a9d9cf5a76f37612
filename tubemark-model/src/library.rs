use std::collections::BTreeMap;

use crate::ids::VideoId;
use crate::mark::Mark;
use crate::video::VideoRecord;

/// The whole persisted state: every known video keyed by its id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct VideoLibrary {
    videos: BTreeMap<VideoId, VideoRecord>,
}

impl VideoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &VideoId) -> Option<&VideoRecord> {
        self.videos.get(id)
    }

    pub fn get_mut(&mut self, id: &VideoId) -> Option<&mut VideoRecord> {
        self.videos.get_mut(id)
    }

    pub fn contains(&self, id: &VideoId) -> bool {
        self.videos.contains_key(id)
    }

    /// Inserts under the record's own id, returning what it replaced.
    pub fn insert(&mut self, record: VideoRecord) -> Option<VideoRecord> {
        self.videos.insert(record.id.clone(), record)
    }

    pub fn remove(&mut self, id: &VideoId) -> Option<VideoRecord> {
        self.videos.remove(id)
    }

    /// Present and not soft-deleted.
    pub fn is_tracked(&self, id: &VideoId) -> bool {
        self.videos.get(id).is_some_and(VideoRecord::is_tracked)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.values()
    }

    pub fn tracked(&self) -> impl Iterator<Item = &VideoRecord> {
        self.videos.values().filter(|record| record.is_tracked())
    }

    /// Every mark paired with its video, videos in id order.
    pub fn marked_moments(
        &self,
    ) -> impl Iterator<Item = (&VideoRecord, &Mark)> {
        self.videos.values().flat_map(|record| {
            record.timestamps.iter().map(move |mark| (record, mark))
        })
    }
}

impl FromIterator<VideoRecord> for VideoLibrary {
    fn from_iter<T: IntoIterator<Item = VideoRecord>>(iter: T) -> Self {
        let mut library = VideoLibrary::new();
        for record in iter {
            library.insert(record);
        }
        library
    }
}
