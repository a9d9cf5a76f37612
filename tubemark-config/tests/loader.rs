use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tubemark_config::sources::EnvConfig;
use tubemark_config::{ConfigLoadError, ConfigLoader, StorageBackend};

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tubemark.toml");
    fs::write(
        &path,
        r#"
[storage]
backend = "file"
path = "state/videos.json"
key = "videos"

[tracker]
interval = "10s"

[host]
max_message_bytes = 65536
queue_capacity = 4

[logging]
filter = "tubemark_core=debug"
"#,
    )
    .expect("write config");

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .without_dotenv()
        .load_with_env(EnvConfig::default(), false)
        .expect("config loads");

    let config = load.config;
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.path, PathBuf::from("state/videos.json"));
    assert_eq!(config.tracker.interval, Duration::from_secs(10));
    assert_eq!(config.host.max_message_bytes, 65536);
    assert_eq!(config.host.queue_capacity, 4);
    assert_eq!(config.logging.filter, "tubemark_core=debug");
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.is_empty());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("nope.toml"))
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn unknown_keys_fail_to_parse() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tubemark.toml");
    fs::write(&path, "[storage]\nbackend = \"file\"\nlocation = \"x\"\n")
        .expect("write config");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn guard_rails_run_after_composition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tubemark.toml");
    fs::write(&path, "[host]\nmax_message_bytes = 2000000\n")
        .expect("write config");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::GuardRail(_)));
}

#[test]
fn env_config_path_is_honoured() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[storage]\nbackend = \"memory\"\n").expect("write");

    let env = EnvConfig {
        config_path: Some(path.clone()),
        ..EnvConfig::default()
    };
    let load = ConfigLoader::new()
        .load_with_env(env, false)
        .expect("config loads");
    assert_eq!(load.config.storage.backend, StorageBackend::Memory);
    // memory backend always warns
    assert_eq!(load.warnings.items.len(), 1);
}
