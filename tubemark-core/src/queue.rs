//! Single-writer command queue in front of a [`VideoStore`].
//!
//! Every read-modify-write cycle issued through a [`StoreHandle`] runs on
//! one worker task, so interleaved commands can never lose each other's
//! updates.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use tubemark_contracts::{Command, CommandResponse};

use crate::error::{Result, StoreError};
use crate::service::{VideoStore, respond};

#[derive(Debug)]
enum Message {
    Typed(Command),
    Raw(Value),
}

type Reply = oneshot::Sender<Result<CommandResponse>>;

/// Cloneable sender side of the store worker.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<(Message, Reply)>,
}

impl StoreHandle {
    /// Starts the worker. It exits once every handle has been dropped.
    pub fn spawn(store: VideoStore, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run(store, rx));
        (Self { tx }, worker)
    }

    /// Queues `command` and waits for its result.
    pub async fn execute(&self, command: Command) -> Result<CommandResponse> {
        self.request(Message::Typed(command)).await
    }

    /// Queues `command` and folds any failure into the reply envelope.
    pub async fn dispatch(&self, command: Command) -> CommandResponse {
        respond(self.execute(command).await)
    }

    /// Queues a raw message; parse errors are reported like any other
    /// failure.
    pub async fn dispatch_value(&self, message: Value) -> CommandResponse {
        respond(self.request(Message::Raw(message)).await)
    }

    async fn request(&self, message: Message) -> Result<CommandResponse> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send((message, reply_tx))
            .await
            .map_err(|_| StoreError::QueueClosed)?;
        reply_rx.await.map_err(|_| StoreError::QueueClosed)?
    }
}

async fn run(store: VideoStore, mut rx: mpsc::Receiver<(Message, Reply)>) {
    info!(key = store.key(), "video store worker started");

    while let Some((message, reply)) = rx.recv().await {
        let result = match message {
            Message::Typed(command) => store.execute(command).await,
            Message::Raw(value) => match Command::try_from(value) {
                Ok(command) => store.execute(command).await,
                Err(err) => Err(err.into()),
            },
        };
        if reply.send(result).is_err() {
            debug!("caller went away before the reply was ready");
        }
    }

    info!("video store worker stopped");
}
