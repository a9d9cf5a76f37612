//! # Tubemark Host
//!
//! Entry point of the native-messaging host. `serve` (the default) answers
//! framed commands on stdio; `exec` runs a single command; `track` feeds
//! positions read from stdin to a playback tracker.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tubemark_config::{Config, ConfigLoad, ConfigLoader, StorageBackend};
use tubemark_core::{PlaybackTracker, StoreHandle};
use tubemark_host::{bootstrap, native, track::LineSource};
use tubemark_model::VideoId;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "tubemark-host")]
#[command(about = "Native-messaging host for the tubemark video store")]
struct Cli {
    /// Configuration file (defaults to ./tubemark.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Environment file loaded before reading configuration
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Storage document path (overrides config)
    #[arg(long, global = true, conflicts_with = "memory")]
    storage_path: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true, default_value_t = false)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer length-prefixed JSON commands on stdin/stdout
    Serve,
    /// Run one JSON command and print the reply
    Exec {
        /// Command object, e.g. '{"type":"CHECK_VIDEO","id":"abc"}'
        message: String,
    },
    /// Report playback positions (one number per line on stdin) for a video
    Track {
        /// Video to update
        id: String,
        /// Interval between updates (overrides config), e.g. "2s"
        #[arg(long, value_parser = humantime_duration)]
        interval: Option<Duration>,
    },
}

fn humantime_duration(raw: &str) -> Result<Duration, String> {
    raw.parse::<humantime::Duration>()
        .map(Into::into)
        .map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli)?;

    let store = bootstrap::build_store(&config);
    let (handle, worker) =
        StoreHandle::spawn(store, config.host.queue_capacity);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(
                max_message_bytes = config.host.max_message_bytes,
                "serving native messages on stdio"
            );
            let summary = native::serve(
                &handle,
                tokio::io::stdin(),
                tokio::io::stdout(),
                config.host.max_message_bytes,
            )
            .await
            .context("native messaging loop failed")?;
            info!(
                messages = summary.messages,
                rejected = summary.rejected,
                "stdin closed; shutting down"
            );
        }
        Command::Exec { message } => {
            let message: Value = serde_json::from_str(&message)
                .context("exec expects a JSON command object")?;
            let response = handle.dispatch_value(message).await;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Track { id, interval } => {
            let video_id = VideoId::new(id).context("invalid video id")?;
            let tracker = PlaybackTracker::new(
                handle.clone(),
                video_id,
                interval.unwrap_or(config.tracker.interval),
            );
            let source = LineSource::new(tokio::io::BufReader::new(
                tokio::io::stdin(),
            ));
            let summary = tracker.run(&source).await;
            println!(
                "{} updates, {} unchanged, stopped: {:?}",
                summary.updates, summary.skipped, summary.stop
            );
        }
    }

    drop(handle);
    worker.await.context("video store worker panicked")?;
    Ok(())
}

fn load_runtime_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(path) = &cli.storage_path {
        config.storage.backend = StorageBackend::File;
        config.storage.path = path.clone();
    }
    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    bootstrap::init_tracing(&config.logging.filter);
    bootstrap::report_warnings(&warnings);
    Ok(config)
}
