use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use tubemark_contracts::{Command, CommandResponse};
use tubemark_model::{VideoLibrary, VideoRecord};

use crate::error::{Result, StoreError};
use crate::storage::StorageArea;
use crate::transitions;

/// Storage key the library lives under unless configured otherwise.
pub const DEFAULT_LIBRARY_KEY: &str = "videos";

/// Executes commands against the library persisted in a [`StorageArea`].
///
/// Each command reads the whole library, applies one transition and writes
/// the whole library back. The store itself does not serialize callers;
/// concurrent use goes through [`crate::queue::StoreHandle`].
#[derive(Clone)]
pub struct VideoStore {
    storage: Arc<dyn StorageArea>,
    key: String,
}

impl fmt::Debug for VideoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl VideoStore {
    pub fn new(storage: Arc<dyn StorageArea>) -> Self {
        Self::with_key(storage, DEFAULT_LIBRARY_KEY)
    }

    pub fn with_key(
        storage: Arc<dyn StorageArea>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current library; an unset or `null` key is an empty library.
    ///
    /// Entries that do not decode are skipped with a warning.
    pub async fn load(&self) -> Result<VideoLibrary> {
        Ok(self.read().await?.library)
    }

    async fn read(&self) -> Result<StoredLibrary> {
        let value = match self.storage.get(&self.key).await? {
            None | Some(Value::Null) => return Ok(StoredLibrary::default()),
            Some(value) => value,
        };

        let entries: Map<String, Value> = serde_json::from_value(value)
            .map_err(|source| StoreError::CorruptState {
                key: self.key.clone(),
                source,
            })?;

        let mut stored = StoredLibrary::default();
        for (key, raw) in entries {
            match decode_entry(&key, &raw) {
                Ok(record) => {
                    stored.library.insert(record);
                }
                Err(error) => {
                    warn!(
                        video_id = %key,
                        %error,
                        "skipping unreadable stored video"
                    );
                    stored.unreadable.insert(key, raw);
                }
            }
        }
        Ok(stored)
    }

    /// Writes the library back, keeping raw entries that failed to decode
    /// unless a record now lives under the same key.
    async fn write(&self, stored: &StoredLibrary) -> Result<()> {
        let mut entries = stored.unreadable.clone();
        if let Value::Object(videos) = serde_json::to_value(&stored.library)? {
            entries.extend(videos);
        }
        self.storage.set(&self.key, Value::Object(entries)).await?;
        Ok(())
    }

    /// Runs one command, surfacing failures as errors.
    pub async fn execute(&self, command: Command) -> Result<CommandResponse> {
        let kind = command.kind();
        let mut stored = self.read().await?;
        let response = transitions::apply(&mut stored.library, command)?;
        if !kind.is_read_only() {
            self.write(&stored).await?;
        }
        debug!(
            command = %kind,
            videos = stored.library.len(),
            unreadable = stored.unreadable.len(),
            "command applied"
        );
        Ok(response)
    }

    /// Runs one command and folds any failure into the reply envelope.
    #[instrument(
        skip(self, command),
        fields(command = %command.kind(), video_id)
    )]
    pub async fn dispatch(&self, command: Command) -> CommandResponse {
        if let Some(id) = command.video_id() {
            tracing::Span::current().record("video_id", id.as_str());
        }
        respond(self.execute(command).await)
    }

    /// Parses a raw message and dispatches it.
    pub async fn dispatch_value(&self, message: Value) -> CommandResponse {
        match Command::try_from(message) {
            Ok(command) => self.dispatch(command).await,
            Err(err) => respond(Err(StoreError::from(err))),
        }
    }
}

#[derive(Debug, Default)]
struct StoredLibrary {
    library: VideoLibrary,
    unreadable: Map<String, Value>,
}

/// Decodes one stored entry; the key it sits under is its id.
fn decode_entry(key: &str, raw: &Value) -> serde_json::Result<VideoRecord> {
    let mut fields = raw.clone();
    if let Value::Object(map) = &mut fields {
        map.insert("id".into(), Value::String(key.to_owned()));
    }
    serde_json::from_value(fields)
}

/// The single place a [`StoreError`] turns into a failure reply.
pub(crate) fn respond(result: Result<CommandResponse>) -> CommandResponse {
    match result {
        Ok(response) => response,
        Err(error) => {
            warn!(%error, "command failed");
            CommandResponse::failed(error)
        }
    }
}
