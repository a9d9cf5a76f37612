use thiserror::Error;

use crate::models::{Config, NATIVE_MESSAGE_LIMIT, StorageBackend};

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("tracker interval must be greater than zero")]
    ZeroTrackerInterval,
    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,
    #[error("max_message_bytes must be between 1 and 1048576 (got {0})")]
    MessageLimit(usize),
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.storage.key.trim().is_empty() {
        return Err(ConfigGuardRailError::EmptyStorageKey);
    }
    if config.tracker.interval.is_zero() {
        return Err(ConfigGuardRailError::ZeroTrackerInterval);
    }
    if config.host.queue_capacity == 0 {
        return Err(ConfigGuardRailError::ZeroQueueCapacity);
    }
    let limit = config.host.max_message_bytes;
    if limit == 0 || limit > NATIVE_MESSAGE_LIMIT {
        return Err(ConfigGuardRailError::MessageLimit(limit));
    }

    if config.storage.backend == StorageBackend::Memory {
        warnings.push_with_hint(
            "Memory storage selected; videos and marks are lost when the host exits",
            "Set storage.backend = \"file\" to persist state",
        );
    }

    if config.tracker.interval.as_millis() < 250 {
        warnings.push(
            "Tracker interval below 250ms rewrites the whole library several times a second",
        );
    }

    Ok(warnings)
}
