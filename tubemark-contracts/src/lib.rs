//! Message contract between the extension's pages and the video store.

pub mod command;
pub mod error;
pub mod response;
pub mod views;

pub use command::{
    Command, CommandKind, MarkTarget, MarkVideo, NewVideo, RemoveMark,
    UpdateVideo, VideoRef,
};
pub use error::ContractError;
pub use response::CommandResponse;
pub use views::{LibraryOverview, MarkTile, PlaybackPosition, VideoTile};

/// Frequently used imports for callers that build or answer commands.
pub mod prelude {
    pub use super::command::{Command, CommandKind, MarkTarget};
    pub use super::response::CommandResponse;
    pub use tubemark_model::{Mark, MarkId, VideoId, VideoLibrary, VideoRecord};
}
