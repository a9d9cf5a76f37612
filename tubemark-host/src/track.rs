//! Position samples read line by line from an input stream.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::Mutex;
use tracing::warn;
use tubemark_core::PlaybackSource;

/// Each line is one playback offset in seconds; end of input means the
/// player is gone.
#[derive(Debug)]
pub struct LineSource<R> {
    lines: Mutex<Lines<R>>,
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

#[async_trait]
impl<R> PlaybackSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn current_time(&self) -> Option<f64> {
        let mut lines = self.lines.lock().await;
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(error) => {
                    warn!(%error, "position input failed");
                    return None;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<f64>() {
                Ok(time) => return Some(time),
                Err(_) => warn!(line, "ignoring position that is not a number"),
            }
        }
    }
}
