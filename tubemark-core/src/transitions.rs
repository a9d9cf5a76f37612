//! In-memory state transitions, one per command.
//!
//! Nothing here touches storage; [`apply`] mutates the library it is given
//! and reports what the caller should reply.

use serde_json::to_value;
use tracing::debug;
use tubemark_contracts::{
    Command, CommandKind, CommandResponse, LibraryOverview, MarkVideo,
    NewVideo, PlaybackPosition, RemoveMark, UpdateVideo, VideoRef,
};
use tubemark_model::{
    Mark, Tracking, VideoLibrary, VideoRecord, sanitize_seconds,
};

use crate::error::{Result, StoreError};

/// Applies `command` to `library`.
///
/// Errors leave the library untouched.
pub fn apply(
    library: &mut VideoLibrary,
    command: Command,
) -> Result<CommandResponse> {
    match command {
        Command::NewVideo(cmd) => new_video(library, cmd),
        Command::UpdateVideo(cmd) => update_video(library, cmd),
        Command::CheckVideo(cmd) => check_video(library, cmd),
        Command::RemoveVideo(cmd) => remove_video(library, cmd),
        Command::MarkVideo(cmd) => mark_video(library, cmd),
        Command::RemoveMark(cmd) => remove_mark(library, cmd),
        Command::ListVideos => list_videos(library),
    }
}

fn seconds(value: Option<f64>) -> f64 {
    value.map(sanitize_seconds).unwrap_or(0.0)
}

fn new_video(
    library: &mut VideoLibrary,
    cmd: NewVideo,
) -> Result<CommandResponse> {
    let NewVideo {
        id,
        title,
        time,
        duration,
    } = cmd;

    let carried = library
        .remove(&id)
        .map(|previous| previous.timestamps)
        .unwrap_or_default();

    let mut record =
        VideoRecord::tracked(id, title, seconds(time), seconds(duration));
    record.timestamps = carried;
    debug!(
        video_id = %record.id,
        marks = record.timestamps.len(),
        "tracking video"
    );
    library.insert(record);
    Ok(CommandResponse::done())
}

fn update_video(
    library: &mut VideoLibrary,
    cmd: UpdateVideo,
) -> Result<CommandResponse> {
    let record = library
        .get_mut(&cmd.id)
        .ok_or_else(|| StoreError::missing(CommandKind::UpdateVideo, &cmd.id))?;
    record.tracking = Tracking::active(seconds(cmd.time));
    Ok(CommandResponse::done())
}

fn check_video(
    library: &VideoLibrary,
    cmd: VideoRef,
) -> Result<CommandResponse> {
    let position = library
        .get(&cmd.id)
        .and_then(|record| record.tracking.position());

    match position {
        Some(time) => Ok(CommandResponse::with_data(to_value(
            PlaybackPosition { time },
        )?)),
        None => Ok(CommandResponse::not_found()),
    }
}

fn remove_video(
    library: &mut VideoLibrary,
    cmd: VideoRef,
) -> Result<CommandResponse> {
    let record = library
        .get_mut(&cmd.id)
        .ok_or_else(|| StoreError::missing(CommandKind::RemoveVideo, &cmd.id))?;

    if record.is_tracked() {
        record.tracking = Tracking::Removed;
        debug!(video_id = %cmd.id, "video soft-deleted");
    } else if record.is_prunable() {
        library.remove(&cmd.id);
        debug!(video_id = %cmd.id, "video hard-deleted");
    }
    Ok(CommandResponse::done())
}

fn mark_video(
    library: &mut VideoLibrary,
    cmd: MarkVideo,
) -> Result<CommandResponse> {
    let MarkVideo {
        id,
        title,
        time,
        duration,
    } = cmd;

    if !library.contains(&id) {
        library.insert(VideoRecord::mark_holder(id.clone(), seconds(duration)));
    }
    let record = library
        .get_mut(&id)
        .ok_or_else(|| StoreError::missing(CommandKind::MarkVideo, &id))?;
    record.timestamps.push(Mark::new(title, seconds(time)));
    Ok(CommandResponse::done())
}

fn remove_mark(
    library: &mut VideoLibrary,
    cmd: RemoveMark,
) -> Result<CommandResponse> {
    let record = library
        .get_mut(&cmd.id)
        .ok_or_else(|| StoreError::missing(CommandKind::RemoveMark, &cmd.id))?;

    if let Some(index) = cmd.timestamp.locate(record) {
        record.timestamps.remove(index);
    } else {
        debug!(video_id = %cmd.id, "no mark matched removal target");
    }

    if record.is_prunable() {
        library.remove(&cmd.id);
        debug!(video_id = %cmd.id, "last mark removed from untracked video");
    }
    Ok(CommandResponse::done())
}

fn list_videos(library: &VideoLibrary) -> Result<CommandResponse> {
    let overview = LibraryOverview::from_library(library);
    Ok(CommandResponse::with_data(to_value(overview)?))
}
