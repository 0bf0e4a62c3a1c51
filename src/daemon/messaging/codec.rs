//! Framing of the browser native messaging protocol: every message is a 4 byte length in native
//! (in practice little-endian) byte order followed by that many bytes of UTF-8 json.

use std::io::ErrorKind;

use anyhow::{bail, Context, Result};
use futures::{stream, Stream};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::InboundMessage;

/// Browsers refuse to deliver larger messages to the host.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Reads the next frame. Returns [None] when the stream ends between frames.
pub async fn read_frame(reader: &mut (impl AsyncRead + Unpin)) -> Result<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_MESSAGE_SIZE {
        bail!("Message too large: {len} bytes (max: {MAX_MESSAGE_SIZE} bytes)");
    }

    let mut buffer = vec![0u8; len];
    reader
        .read_exact(&mut buffer)
        .await
        .context("Message was cut off")?;
    Ok(Some(buffer))
}

pub async fn write_frame(
    writer: &mut (impl AsyncWrite + Unpin),
    message: &impl Serialize,
) -> Result<()> {
    let json = serde_json::to_vec(message)?;
    if json.len() > MAX_MESSAGE_SIZE {
        bail!("Reply too large: {} bytes", json.len());
    }

    writer.write_all(&(json.len() as u32).to_le_bytes()).await?;
    writer.write_all(&json).await?;
    writer.flush().await?;
    Ok(())
}

/// Turns a byte stream into a stream of messages. Messages that aren't valid json are yielded as
/// errors and reading goes on; a framing error is yielded once and ends the stream, since there's
/// no way to find the next frame boundary afterwards.
pub fn inbound_messages(
    reader: impl AsyncRead + Unpin,
) -> impl Stream<Item = Result<InboundMessage>> {
    stream::unfold(Some(reader), |reader| async move {
        let mut reader = reader?;
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => {
                let message = serde_json::from_slice::<InboundMessage>(&frame)
                    .with_context(|| {
                        format!("Illegal message {}", String::from_utf8_lossy(&frame))
                    });
                Some((message, Some(reader)))
            }
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
}
