//! Request envelopes accepted by the video store.
//!
//! Every request is a JSON object whose `type` field selects the command;
//! the remaining fields are command specific.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tubemark_model::{MarkId, VideoId, VideoRecord};

use crate::error::ContractError;

/// A single request to the video store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    NewVideo(NewVideo),
    UpdateVideo(UpdateVideo),
    CheckVideo(VideoRef),
    RemoveVideo(VideoRef),
    MarkVideo(MarkVideo),
    RemoveMark(RemoveMark),
    ListVideos,
}

/// Start (or restart) tracking a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVideo {
    pub id: VideoId,
    pub title: String,
    #[serde(
        default,
        alias = "currentTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Periodic position report for a tracked video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateVideo {
    pub id: VideoId,
    #[serde(
        default,
        alias = "currentTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: VideoId,
}

/// Save a named moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkVideo {
    pub id: VideoId,
    pub title: String,
    #[serde(
        default,
        alias = "currentTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveMark {
    pub id: VideoId,
    pub timestamp: MarkTarget,
}

/// Which mark a removal addresses.
///
/// Value matching on `(title, time)` is the long-standing contract; marks that
/// carry an id can be addressed exactly, and a bare number matches the first
/// mark at that offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkTarget {
    Offset(f64),
    ById {
        id: MarkId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<f64>,
    },
    ByValue {
        title: String,
        time: f64,
    },
}

impl MarkTarget {
    /// Index of the first mark in `record` this target selects.
    pub fn locate(&self, record: &VideoRecord) -> Option<usize> {
        match self {
            MarkTarget::Offset(time) => record.position_of_time(*time),
            MarkTarget::ById { id, title, time } => {
                record.position_of_mark(id).or_else(|| match (title, time) {
                    (Some(title), Some(time)) => {
                        record.position_of_moment(title, *time)
                    }
                    _ => None,
                })
            }
            MarkTarget::ByValue { title, time } => {
                record.position_of_moment(title, *time)
            }
        }
    }
}

/// Discriminator values of [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    NewVideo,
    UpdateVideo,
    CheckVideo,
    RemoveVideo,
    MarkVideo,
    RemoveMark,
    ListVideos,
}

impl CommandKind {
    pub const ALL: [CommandKind; 7] = [
        CommandKind::NewVideo,
        CommandKind::UpdateVideo,
        CommandKind::CheckVideo,
        CommandKind::RemoveVideo,
        CommandKind::MarkVideo,
        CommandKind::RemoveMark,
        CommandKind::ListVideos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::NewVideo => "NEW_VIDEO",
            CommandKind::UpdateVideo => "UPDATE_VIDEO",
            CommandKind::CheckVideo => "CHECK_VIDEO",
            CommandKind::RemoveVideo => "REMOVE_VIDEO",
            CommandKind::MarkVideo => "MARK_VIDEO",
            CommandKind::RemoveMark => "REMOVE_MARK",
            CommandKind::ListVideos => "LIST_VIDEOS",
        }
    }

    /// Commands that never write the library back.
    pub fn is_read_only(&self) -> bool {
        matches!(self, CommandKind::CheckVideo | CommandKind::ListVideos)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ContractError::UnknownCommand(s.to_string()))
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::NewVideo(_) => CommandKind::NewVideo,
            Command::UpdateVideo(_) => CommandKind::UpdateVideo,
            Command::CheckVideo(_) => CommandKind::CheckVideo,
            Command::RemoveVideo(_) => CommandKind::RemoveVideo,
            Command::MarkVideo(_) => CommandKind::MarkVideo,
            Command::RemoveMark(_) => CommandKind::RemoveMark,
            Command::ListVideos => CommandKind::ListVideos,
        }
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        match self {
            Command::NewVideo(cmd) => Some(&cmd.id),
            Command::UpdateVideo(cmd) => Some(&cmd.id),
            Command::CheckVideo(cmd) | Command::RemoveVideo(cmd) => {
                Some(&cmd.id)
            }
            Command::MarkVideo(cmd) => Some(&cmd.id),
            Command::RemoveMark(cmd) => Some(&cmd.id),
            Command::ListVideos => None,
        }
    }

    pub fn update_video(id: VideoId, time: f64) -> Self {
        Command::UpdateVideo(UpdateVideo {
            id,
            time: Some(time),
        })
    }

    pub fn check_video(id: VideoId) -> Self {
        Command::CheckVideo(VideoRef { id })
    }

    pub fn remove_video(id: VideoId) -> Self {
        Command::RemoveVideo(VideoRef { id })
    }
}

impl TryFrom<Value> for Command {
    type Error = ContractError;

    /// Parses a raw message, telling unknown commands apart from known
    /// commands with bad fields.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.parse::<CommandKind>()?,
            _ => return Err(ContractError::MissingType),
        };

        serde_json::from_value(value).map_err(|source| {
            ContractError::Malformed {
                kind: kind.as_str(),
                source,
            }
        })
    }
}
