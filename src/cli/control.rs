use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tracing::info;

use crate::daemon::{
    handle::TrackerControl,
    messaging::{InboundMessage, OutboundMessage},
    storage::entities::DomainTotals,
    CONTROL_SOCKET_NAME,
};

/// Client side of the host control socket.
pub struct ControlClient {
    path: PathBuf,
}

impl ControlClient {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CONTROL_SOCKET_NAME),
        }
    }

    /// Asks the running tracker for the persisted totals. [None] when no tracker is running.
    pub async fn get_time_data(&self) -> Result<Option<DomainTotals>> {
        match self.request(&InboundMessage::GetTimeData).await? {
            None => Ok(None),
            Some(OutboundMessage::TimeData { data }) => Ok(Some(data)),
            Some(OutboundMessage::Error { message }) => bail!("Tracker failed: {message}"),
            Some(other) => bail!("Unexpected reply {other:?}"),
        }
    }

    #[cfg(unix)]
    async fn request(&self, message: &InboundMessage) -> Result<Option<OutboundMessage>> {
        use std::io::ErrorKind;

        use tokio::{
            io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
            net::UnixStream,
        };

        let stream = match UnixStream::connect(&self.path).await {
            Ok(stream) => stream,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        let (read, mut write) = stream.into_split();
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        write.write_all(&line).await?;
        write.shutdown().await?;

        let reply = BufReader::new(read)
            .lines()
            .next_line()
            .await?
            .ok_or_else(|| anyhow!("Tracker closed the connection without replying"))?;
        Ok(Some(serde_json::from_str(&reply)?))
    }

    #[cfg(not(unix))]
    async fn request(&self, _message: &InboundMessage) -> Result<Option<OutboundMessage>> {
        info!("Control socket is only available on unix, {:?} is unused", self.path);
        Ok(None)
    }
}

#[async_trait]
impl TrackerControl for ControlClient {
    async fn reset_tracking(&self) -> Result<()> {
        match self.request(&InboundMessage::ResetTimeTracking).await? {
            None => {
                info!("No tracker is running, nothing to reset in memory");
                Ok(())
            }
            Some(OutboundMessage::ResetDone) => Ok(()),
            Some(OutboundMessage::Error { message }) => bail!("Tracker failed to reset: {message}"),
            Some(other) => bail!("Unexpected reply {other:?}"),
        }
    }
}
