use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use storage::domain_store::{DomainStore, JsonFileStore};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracker::module::TrackerModule;

use crate::utils::clock::{Clock, DefaultClock};

use events::TrackerEvent;
use handle::TrackerHandle;

pub mod args;
#[cfg(unix)]
pub mod control;
pub mod events;
pub mod handle;
pub mod messaging;
pub mod shutdown;
pub mod storage;
pub mod tracker;

const DEFAULT_TICK_FREQUENCY: Duration = Duration::from_secs(1);

const EVENT_BUFFER: usize = 32;

/// File name of the control socket inside the application directory.
pub const CONTROL_SOCKET_NAME: &str = "control.sock";

/// Represents the starting point for the host. Talks to the browser over stdin and stdout.
pub async fn start_host(dir: PathBuf) -> Result<()> {
    run_host(
        dir,
        tokio::io::stdin(),
        tokio::io::stdout(),
        DefaultClock,
        DEFAULT_TICK_FREQUENCY,
    )
    .await
}

async fn run_host(
    dir: PathBuf,
    reader: impl AsyncRead + Unpin,
    writer: impl AsyncWrite + Unpin,
    clock: impl Clock,
    tick_frequency: Duration,
) -> Result<()> {
    let (sender, receiver) = mpsc::channel::<TrackerEvent>(EVENT_BUFFER);
    let handle = TrackerHandle::new(sender);
    let shutdown_token = CancellationToken::new();

    let store = JsonFileStore::new(&dir)?;
    let tracker = create_tracker(receiver, store, &shutdown_token, clock, tick_frequency);

    let messaging = {
        let handle = handle.clone();
        let shutdown_token = shutdown_token.clone();
        async move {
            let result = tokio::select! {
                result = messaging::serve_native_messages(reader, writer, handle) => result,
                _ = shutdown_token.cancelled() => Ok(()),
            };
            // Without the browser there's nothing left to track.
            shutdown_token.cancel();
            result
        }
    };

    #[cfg(unix)]
    let control = control::serve_control(
        dir.join(CONTROL_SOCKET_NAME),
        handle,
        shutdown_token.clone(),
    );
    #[cfg(not(unix))]
    let control = async move {
        drop(handle);
        anyhow::Ok(())
    };

    let (_, tracker_result, messaging_result, control_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        tracker.run(),
        messaging,
        control,
    );

    if let Err(tracker_result) = tracker_result {
        error!("Tracker module got an error {:?}", tracker_result);
    }

    if let Err(messaging_result) = messaging_result {
        error!("Native messaging got an error {:?}", messaging_result);
    }

    if let Err(control_result) = control_result {
        error!("Control socket got an error {:?}", control_result);
    }

    Ok(())
}

fn create_tracker<S: DomainStore>(
    receiver: mpsc::Receiver<TrackerEvent>,
    store: S,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
    tick_frequency: Duration,
) -> TrackerModule<S> {
    TrackerModule::new(
        receiver,
        store,
        shutdown_token.clone(),
        tick_frequency,
        Box::new(clock),
    )
}

#[cfg(test)]
mod host_tests {
    use std::time::Duration;

    use anyhow::Result;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde::Serialize;
    use tempfile::tempdir;
    use tokio::io::{AsyncRead, AsyncWrite};

    use crate::{
        daemon::{
            messaging::{
                codec::{read_frame, write_frame},
                InboundMessage, OutboundMessage,
            },
            run_host,
            storage::{
                domain_store::{DomainStore, JsonFileStore},
                entities::DomainTotals,
            },
        },
        host_api::TabId,
        test_utils::TestClock,
        utils::logging::TEST_LOGGING,
    };

    async fn request(
        writer: &mut (impl AsyncWrite + Unpin),
        reader: &mut (impl AsyncRead + Unpin),
        message: &impl Serialize,
    ) -> Result<OutboundMessage> {
        write_frame(writer, message).await?;
        let frame = read_frame(reader).await?.expect("host should reply");
        Ok(serde_json::from_slice(&frame)?)
    }

    async fn time_data(
        writer: &mut (impl AsyncWrite + Unpin),
        reader: &mut (impl AsyncRead + Unpin),
    ) -> Result<DomainTotals> {
        match request(writer, reader, &InboundMessage::GetTimeData).await? {
            OutboundMessage::TimeData { data } => Ok(data),
            other => panic!("Unexpected reply {other:?}"),
        }
    }

    /// Talks to the host the way the browser extension does. Ticks are pushed out of the way so
    /// that only the manually advanced clock decides how much time passes.
    #[tokio::test]
    async fn smoke_test_host() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let clock = TestClock::new(Utc.with_ymd_and_hms(2018, 7, 4, 0, 0, 0).unwrap());
        let (host_in, mut browser_out) = tokio::io::duplex(4096);
        let (mut browser_in, host_out) = tokio::io::duplex(4096);

        let host = tokio::spawn(run_host(
            dir.path().to_path_buf(),
            host_in,
            host_out,
            clock.clone(),
            Duration::from_secs(3600),
        ));

        write_frame(&mut browser_out, &InboundMessage::Installed).await?;
        write_frame(
            &mut browser_out,
            &InboundMessage::TabActivated {
                tab_id: TabId(1),
                url: Some("https://example.com/start".into()),
            },
        )
        .await?;
        assert!(time_data(&mut browser_out, &mut browser_in).await?.is_empty());

        clock.advance(TimeDelta::seconds(5));
        write_frame(
            &mut browser_out,
            &InboundMessage::TabActivated {
                tab_id: TabId(2),
                url: Some("https://other.org".into()),
            },
        )
        .await?;
        assert_eq!(
            time_data(&mut browser_out, &mut browser_in).await?,
            DomainTotals::from([("example.com".into(), 5)])
        );

        clock.advance(TimeDelta::seconds(3));
        write_frame(
            &mut browser_out,
            &InboundMessage::TabRemoved { tab_id: TabId(2) },
        )
        .await?;
        assert_eq!(
            time_data(&mut browser_out, &mut browser_in).await?,
            DomainTotals::from([("example.com".into(), 5), ("other.org".into(), 3)])
        );

        // The caller clears the store, the host only forgets its memory.
        JsonFileStore::new(dir.path())?.clear().await?;
        assert_eq!(
            request(
                &mut browser_out,
                &mut browser_in,
                &InboundMessage::ResetTimeTracking
            )
            .await?,
            OutboundMessage::ResetDone
        );
        assert!(time_data(&mut browser_out, &mut browser_in).await?.is_empty());

        drop(browser_out);
        host.await??;

        assert_eq!(read_frame(&mut browser_in).await?, None);

        let stored = JsonFileStore::new(dir.path())?.get_all().await?;
        assert!(stored.is_empty());
        Ok(())
    }
}
