use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::loader::ConfigLoadError;
use crate::models::StorageBackend;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub tracker: FileTrackerConfig,
    #[serde(default)]
    pub host: FileHostConfig,
    #[serde(default)]
    pub logging: FileLoggingConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileTrackerConfig {
    /// Humantime duration such as `"5s"` or `"1500ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileHostConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_message_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub storage_backend: Option<StorageBackend>,
    pub storage_path: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub tracker_interval: Option<Duration>,
    pub max_message_bytes: Option<usize>,
    pub queue_capacity: Option<usize>,
    pub log_filter: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the environment layer from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name).filter(|value| !value.trim().is_empty())
        };

        let mut env_config = Self::default();

        env_config.config_path = var("TUBEMARK_CONFIG").map(PathBuf::from);
        env_config.storage_backend = var("TUBEMARK_STORAGE_BACKEND")
            .map(|raw| {
                raw.parse::<StorageBackend>().map_err(|reason| {
                    ConfigLoadError::InvalidEnv {
                        name: "TUBEMARK_STORAGE_BACKEND",
                        reason,
                    }
                })
            })
            .transpose()?;
        env_config.storage_path =
            var("TUBEMARK_STORAGE_PATH").map(PathBuf::from);
        env_config.storage_key = var("TUBEMARK_STORAGE_KEY");
        env_config.tracker_interval = var("TUBEMARK_TRACKER_INTERVAL")
            .map(|raw| {
                humantime::parse_duration(raw.trim()).map_err(|err| {
                    ConfigLoadError::InvalidEnv {
                        name: "TUBEMARK_TRACKER_INTERVAL",
                        reason: err.to_string(),
                    }
                })
            })
            .transpose()?;
        env_config.max_message_bytes =
            parse_number(var("TUBEMARK_MAX_MESSAGE_BYTES"), "TUBEMARK_MAX_MESSAGE_BYTES")?;
        env_config.queue_capacity =
            parse_number(var("TUBEMARK_QUEUE_CAPACITY"), "TUBEMARK_QUEUE_CAPACITY")?;
        env_config.log_filter = var("TUBEMARK_LOG");

        Ok(env_config)
    }
}

fn parse_number(
    raw: Option<String>,
    name: &'static str,
) -> Result<Option<usize>, ConfigLoadError> {
    raw.map(|value| {
        value.trim().parse::<usize>().map_err(|err| {
            ConfigLoadError::InvalidEnv {
                name,
                reason: err.to_string(),
            }
        })
    })
    .transpose()
}
