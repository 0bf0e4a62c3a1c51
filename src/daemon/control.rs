//! Local control socket of the host. Lets processes other than the browser (the cli) reach the
//! running tracker. One json request per line, one json reply per line.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{UnixListener, UnixStream},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{
    handle::TrackerHandle,
    messaging::{dispatch, InboundMessage, OutboundMessage},
};

pub async fn serve_control(
    path: PathBuf,
    handle: TrackerHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    remove_socket(&path)?;
    let listener = UnixListener::bind(&path)?;
    info!("Listening for control requests on {path:?}");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => {
                    let handle = handle.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, handle).await {
                            warn!("Control connection failed {e:?}");
                        }
                    });
                }
                Err(e) => error!("Failed to accept control connection {e:?}"),
            }
        }
    }

    remove_socket(&path)?;
    Ok(())
}

fn remove_socket(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn handle_connection(stream: UnixStream, handle: TrackerHandle) -> Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    while let Some(line) = lines.next_line().await? {
        debug!("Control request {line}");
        let reply = match serde_json::from_str::<InboundMessage>(&line) {
            Ok(message) => dispatch(message, &handle).await?,
            Err(e) => Some(OutboundMessage::Error {
                message: format!("Illegal request: {e}"),
            }),
        };

        if let Some(reply) = reply {
            let mut bytes = serde_json::to_vec(&reply)?;
            bytes.push(b'\n');
            write.write_all(&bytes).await?;
        }
    }
    Ok(())
}
