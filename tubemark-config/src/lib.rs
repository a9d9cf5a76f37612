//! Configuration for the tubemark store and native-messaging host.
//!
//! Values are layered: environment variables win over `tubemark.toml`,
//! which wins over built-in defaults. A `.env` file next to the process is
//! loaded into the environment first when present.
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    Config, ConfigMetadata, HostConfig, LoggingConfig, StorageBackend,
    StorageConfig, TrackerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
