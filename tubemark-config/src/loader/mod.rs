use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::{
    Config, ConfigMetadata, HostConfig, LoggingConfig, StorageConfig,
    TrackerConfig,
};
use crate::sources::{EnvConfig, FileConfig};
use crate::validation::{self, ConfigGuardRailError, ConfigWarnings};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["tubemark.toml", "config/tubemark.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Skip `.env` discovery entirely (explicit `env_file` still loads).
    pub skip_dotenv: bool,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

/// A loaded configuration plus anything worth telling the operator.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.options.skip_dotenv = true;
        self
    }

    /// Loads `.env`, then the process environment, then the config file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let env_config = EnvConfig::gather()?;
        self.load_with_env(env_config, env_file_loaded)
    }

    /// Same as [`ConfigLoader::load`] but with an already gathered
    /// environment layer.
    pub fn load_with_env(
        &self,
        env_config: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env_config)?;
        let (config, mut warnings) = compose_config(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;
        warnings.extend(validation::apply_guard_rails(&config)?);
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None if self.options.skip_dotenv => false,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };
        Ok(loaded)
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(found) => found,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok((Some(file_config), Some(path)))
    }
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Layers environment over file over defaults.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();
    let config_present = file_config.is_some();

    let FileConfig {
        storage: file_storage,
        tracker: file_tracker,
        host: file_host,
        logging: file_logging,
    } = file_config.unwrap_or_default();

    let storage_defaults = StorageConfig::default();
    let storage_path_from_env = env.storage_path.is_some();
    let storage = StorageConfig {
        backend: env
            .storage_backend
            .or(file_storage.backend)
            .unwrap_or(storage_defaults.backend),
        path: env
            .storage_path
            .or(file_storage.path)
            .unwrap_or(storage_defaults.path),
        key: env
            .storage_key
            .or(file_storage.key)
            .unwrap_or(storage_defaults.key),
    };

    let tracker = TrackerConfig {
        interval: match (env.tracker_interval, file_tracker.interval) {
            (Some(interval), _) => interval,
            (None, Some(raw)) => humantime::parse_duration(raw.trim())
                .map_err(|err| ConfigLoadError::Invalid {
                    field: "tracker.interval",
                    reason: err.to_string(),
                })?,
            (None, None) => TrackerConfig::default().interval,
        },
    };

    let host_defaults = HostConfig::default();
    let host = HostConfig {
        max_message_bytes: env
            .max_message_bytes
            .or(file_host.max_message_bytes)
            .unwrap_or(host_defaults.max_message_bytes),
        queue_capacity: env
            .queue_capacity
            .or(file_host.queue_capacity)
            .unwrap_or(host_defaults.queue_capacity),
    };

    let logging = LoggingConfig {
        filter: env
            .log_filter
            .or(file_logging.filter)
            .unwrap_or_else(|| LoggingConfig::default().filter),
    };

    if !config_present && !storage_path_from_env {
        warnings.push_with_hint(
            "No tubemark.toml detected; using built-in defaults",
            "Create tubemark.toml or set TUBEMARK_STORAGE_PATH to choose where videos are stored",
        );
    }

    Ok((
        Config {
            storage,
            tracker,
            host,
            logging,
            metadata,
        },
        warnings,
    ))
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value in {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StorageBackend;
    use std::time::Duration;

    #[test]
    fn env_overrides_file_values() {
        let file: FileConfig = toml::from_str(
            r#"
            [storage]
            backend = "memory"
            path = "/tmp/from-file.json"

            [tracker]
            interval = "2s"
            "#,
        )
        .unwrap();
        let env = EnvConfig {
            storage_path: Some(PathBuf::from("/tmp/from-env.json")),
            ..EnvConfig::default()
        };

        let (config, warnings) =
            compose_config(Some(file), env, ConfigMetadata::default())
                .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/from-env.json"));
        assert_eq!(config.storage.key, "videos");
        assert_eq!(config.tracker.interval, Duration::from_secs(2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn defaults_warn_when_nothing_is_configured() {
        let (config, warnings) = compose_config(
            None,
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.host.max_message_bytes, 1024 * 1024);
        assert_eq!(warnings.items.len(), 1);
    }

    #[test]
    fn env_storage_path_without_file_skips_default_warning() {
        let env = EnvConfig {
            storage_path: Some(PathBuf::from("/tmp/env-only.json")),
            ..EnvConfig::default()
        };

        let (config, warnings) =
            compose_config(None, env, ConfigMetadata::default()).unwrap();

        assert_eq!(config.storage.path, PathBuf::from("/tmp/env-only.json"));
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(warnings.is_empty());
    }

    #[test]
    fn bad_interval_in_file_is_rejected() {
        let file: FileConfig =
            toml::from_str("[tracker]\ninterval = \"soon\"\n").unwrap();
        let err = compose_config(
            Some(file),
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid {
                field: "tracker.interval",
                ..
            }
        ));
    }

    #[test]
    fn env_lookup_parses_typed_values() {
        let env = EnvConfig::from_lookup(|name| match name {
            "TUBEMARK_STORAGE_BACKEND" => Some("Memory".into()),
            "TUBEMARK_TRACKER_INTERVAL" => Some("1500ms".into()),
            "TUBEMARK_QUEUE_CAPACITY" => Some("8".into()),
            "TUBEMARK_LOG" => Some("   ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(env.storage_backend, Some(StorageBackend::Memory));
        assert_eq!(env.tracker_interval, Some(Duration::from_millis(1500)));
        assert_eq!(env.queue_capacity, Some(8));
        assert_eq!(env.log_filter, None);

        let err = EnvConfig::from_lookup(|name| {
            (name == "TUBEMARK_MAX_MESSAGE_BYTES").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidEnv {
                name: "TUBEMARK_MAX_MESSAGE_BYTES",
                ..
            }
        ));
    }
}
