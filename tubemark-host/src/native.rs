//! Browser native-messaging framing.
//!
//! Each message is a 32-bit length in native byte order followed by that
//! many bytes of UTF-8 JSON, in both directions.

use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use tubemark_contracts::CommandResponse;
use tubemark_core::StoreHandle;

/// Upper bound on a single incoming frame.
pub const MAX_INCOMING_FRAME: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("stdio failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("incoming frame of {0} bytes exceeds the 64 MiB limit")]
    Oversized(usize),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeSummary {
    pub messages: u64,
    pub rejected: u64,
}

/// Next frame body, or `None` once the peer closed the stream.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    }

    let len = u32::from_ne_bytes(header) as usize;
    if len > MAX_INCOMING_FRAME {
        return Err(FrameError::Oversized(len));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(body.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "frame longer than u32::MAX",
        )
    })?;
    writer.write_all(&len.to_ne_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}

/// Serializes `response`, swapping in a failure reply when it would not fit
/// in one message.
pub fn encode_response(
    response: &CommandResponse,
    max_message_bytes: usize,
) -> Result<Vec<u8>, FrameError> {
    let body = serde_json::to_vec(response)?;
    if body.len() <= max_message_bytes {
        return Ok(body);
    }

    warn!(
        bytes = body.len(),
        limit = max_message_bytes,
        "response too large for native messaging"
    );
    let replacement = CommandResponse::failed(format!(
        "response of {} bytes exceeds the {} byte message limit",
        body.len(),
        max_message_bytes
    ));
    Ok(serde_json::to_vec(&replacement)?)
}

/// Answers framed commands from `reader` on `writer` until end of input.
pub async fn serve<R, W>(
    handle: &StoreHandle,
    mut reader: R,
    mut writer: W,
    max_message_bytes: usize,
) -> Result<ServeSummary, FrameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = ServeSummary::default();

    while let Some(frame) = read_frame(&mut reader).await? {
        summary.messages += 1;
        let response = match serde_json::from_slice::<Value>(&frame) {
            Ok(message) => handle.dispatch_value(message).await,
            Err(err) => {
                summary.rejected += 1;
                warn!(error = %err, "discarding message that is not JSON");
                CommandResponse::failed(format!("invalid JSON message: {err}"))
            }
        };
        let body = encode_response(&response, max_message_bytes)?;
        write_frame(&mut writer, &body).await?;
    }

    debug!(
        messages = summary.messages,
        rejected = summary.rejected,
        "input closed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tubemark_core::{MemoryStorage, VideoStore};

    fn frame(value: &[u8]) -> Vec<u8> {
        let mut out = (value.len() as u32).to_ne_bytes().to_vec();
        out.extend_from_slice(value);
        out
    }

    fn frames(mut bytes: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        while !bytes.is_empty() {
            let len =
                u32::from_ne_bytes(bytes[..4].try_into().unwrap()) as usize;
            out.push(serde_json::from_slice(&bytes[4..4 + len]).unwrap());
            bytes = &bytes[4 + len..];
        }
        out
    }

    #[tokio::test]
    async fn serves_until_eof() {
        let store = VideoStore::new(Arc::new(MemoryStorage::new()));
        let (handle, _worker) = StoreHandle::spawn(store, 4);

        let mut input = frame(
            br#"{"type":"NEW_VIDEO","id":"v1","title":"T","time":42,"duration":100}"#,
        );
        input.extend(frame(br#"{"type":"CHECK_VIDEO","id":"v1"}"#));
        input.extend(frame(b"not json"));

        let mut output = Vec::new();
        let summary = serve(&handle, input.as_slice(), &mut output, 1024)
            .await
            .unwrap();

        assert_eq!(summary, ServeSummary { messages: 3, rejected: 1 });
        let replies = frames(&output);
        assert_eq!(replies[0], json!({"success": true, "data": null}));
        assert_eq!(replies[1], json!({"success": true, "data": {"time": 42}}));
        assert_eq!(replies[2]["success"], false);
    }

    #[test]
    fn oversized_responses_are_replaced() {
        let response = CommandResponse::with_data(json!({"blob": "x".repeat(200)}));
        let body = encode_response(&response, 100).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("100 byte"));
    }

    #[tokio::test]
    async fn truncated_body_is_an_error() {
        let mut input = 10u32.to_ne_bytes().to_vec();
        input.extend_from_slice(b"{}");
        let err = read_frame(&mut input.as_slice()).await.unwrap_err();
        assert!(matches!(err, FrameError::Io(_)));
    }

    #[tokio::test]
    async fn empty_input_is_clean_eof() {
        let mut input: &[u8] = &[];
        assert!(read_frame(&mut input).await.unwrap().is_none());
    }
}
