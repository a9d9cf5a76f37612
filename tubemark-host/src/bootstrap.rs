//! Runtime wiring shared by every subcommand.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use tubemark_config::{Config, ConfigWarnings, StorageBackend, StorageConfig};
use tubemark_core::{JsonFileStorage, MemoryStorage, StorageArea, VideoStore};

/// Installs the global subscriber. Logs go to stderr because stdout
/// carries native-messaging frames.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn report_warnings(warnings: &ConfigWarnings) {
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

pub fn build_storage(config: &StorageConfig) -> Arc<dyn StorageArea> {
    match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File => Arc::new(JsonFileStorage::new(&config.path)),
    }
}

pub fn build_store(config: &Config) -> VideoStore {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    match config.storage.backend {
        StorageBackend::File => info!(
            path = %config.storage.path.display(),
            key = %config.storage.key,
            "using file storage"
        ),
        StorageBackend::Memory => info!(key = %config.storage.key, "using memory storage"),
    }
    VideoStore::with_key(build_storage(&config.storage), &config.storage.key)
}
