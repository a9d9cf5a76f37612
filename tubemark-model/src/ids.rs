use crate::error::{ModelError, Result};
use uuid::Uuid;

/// Platform identifier of a video (the `v` query parameter on a watch page).
///
/// Doubles as the key of the persisted library, so it is never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::EmptyVideoId);
        }
        Ok(VideoId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VideoId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        VideoId::new(value)
    }
}

impl TryFrom<&str> for VideoId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self> {
        VideoId::new(value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strongly typed ID for marks, assigned when the mark is created
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct MarkId(pub Uuid);

impl Default for MarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkId {
    pub fn new() -> Self {
        MarkId(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for MarkId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for MarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_rejects_blank_values() {
        assert_eq!(VideoId::new(""), Err(ModelError::EmptyVideoId));
        assert_eq!(VideoId::new("   "), Err(ModelError::EmptyVideoId));
        assert_eq!(VideoId::new("dQw4w9WgXcQ").unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn mark_ids_are_unique() {
        assert_ne!(MarkId::new(), MarkId::new());
    }
}
