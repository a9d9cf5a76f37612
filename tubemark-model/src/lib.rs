//! Data model shared by the tubemark crates: videos, their tracking state
//! and the marks saved inside them.
#![allow(missing_docs)]

pub mod display;
pub mod error;
pub mod ids;
pub mod library;
pub mod mark;
pub mod tracking;
pub mod urls;
pub mod video;

pub use display::{progress_percent, time_label};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{MarkId, VideoId};
pub use library::VideoLibrary;
pub use mark::Mark;
pub use tracking::{REMOVED_SENTINEL, Tracking, sanitize_seconds};
pub use urls::{thumbnail_url, watch_url};
pub use video::VideoRecord;
