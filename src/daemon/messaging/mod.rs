//! Messages exchanged with the browser side. The same messages travel over the native messaging
//! channel and over the local control socket.

pub mod codec;

use anyhow::Result;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::{daemon::storage::entities::DomainTotals, host_api::TabId};

use super::{
    events::TrackerEvent,
    handle::{TrackerControl, TrackerHandle},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    #[serde(rename = "tabActivated")]
    TabActivated {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    #[serde(rename = "tabUpdated")]
    TabUpdated {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    #[serde(rename = "tabRemoved")]
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "startup")]
    Startup,
    #[serde(rename = "installed")]
    Installed,
    #[serde(rename = "getTimeData")]
    GetTimeData,
    #[serde(rename = "resetTimeTracking")]
    ResetTimeTracking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "timeData")]
    TimeData { data: DomainTotals },
    #[serde(rename = "resetDone")]
    ResetDone,
    #[serde(rename = "error")]
    Error { message: String },
}

/// Forwards a message to the tracker. Only commands produce a reply. Fails only if the tracker
/// is no longer running.
pub async fn dispatch(
    message: InboundMessage,
    handle: &TrackerHandle,
) -> Result<Option<OutboundMessage>> {
    let event = match message {
        InboundMessage::TabActivated { tab_id, url } => TrackerEvent::TabActivated { tab_id, url },
        InboundMessage::TabUpdated { tab_id, url } => TrackerEvent::TabUpdated { tab_id, url },
        InboundMessage::TabRemoved { tab_id } => TrackerEvent::TabRemoved { tab_id },
        InboundMessage::Startup => TrackerEvent::Startup,
        InboundMessage::Installed => TrackerEvent::Installed,
        InboundMessage::GetTimeData => {
            let reply = match handle.get_time_data().await {
                Ok(data) => OutboundMessage::TimeData { data },
                Err(e) => OutboundMessage::Error {
                    message: format!("{e:#}"),
                },
            };
            return Ok(Some(reply));
        }
        InboundMessage::ResetTimeTracking => {
            handle.reset_tracking().await?;
            return Ok(Some(OutboundMessage::ResetDone));
        }
    };
    handle.send(event).await?;
    Ok(None)
}

/// Serves the browser until it closes the channel.
pub async fn serve_native_messages(
    reader: impl AsyncRead + Unpin,
    mut writer: impl AsyncWrite + Unpin,
    handle: TrackerHandle,
) -> Result<()> {
    let messages = codec::inbound_messages(reader);
    futures::pin_mut!(messages);

    while let Some(message) = messages.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping message: {e:#}");
                continue;
            }
        };
        debug!("Received {:?}", message);
        if let Some(reply) = dispatch(message, &handle).await? {
            codec::write_frame(&mut writer, &reply).await?;
        }
    }

    info!("Browser closed the messaging channel");
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::{daemon::storage::entities::DomainTotals, host_api::TabId};

    use super::{InboundMessage, OutboundMessage};

    #[test]
    fn test_parse_browser_messages() -> Result<()> {
        assert_eq!(
            serde_json::from_str::<InboundMessage>(r#"{"type":"tabActivated","tabId":12}"#)?,
            InboundMessage::TabActivated {
                tab_id: TabId(12),
                url: None
            }
        );
        assert_eq!(
            serde_json::from_str::<InboundMessage>(
                r#"{"type":"tabUpdated","tabId":12,"url":"https://example.com/x"}"#
            )?,
            InboundMessage::TabUpdated {
                tab_id: TabId(12),
                url: Some("https://example.com/x".into())
            }
        );
        assert_eq!(
            serde_json::from_str::<InboundMessage>(r#"{"type":"resetTimeTracking"}"#)?,
            InboundMessage::ResetTimeTracking
        );
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"tabRemoved"}"#).is_err());
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"unknown"}"#).is_err());
        Ok(())
    }

    #[test]
    fn test_time_data_reply_shape() -> Result<()> {
        let reply = OutboundMessage::TimeData {
            data: DomainTotals::from([("example.com".into(), 5)]),
        };
        assert_eq!(
            serde_json::to_value(&reply)?,
            serde_json::json!({"type": "timeData", "data": {"example.com": 5}})
        );
        Ok(())
    }
}
