use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::daemon::storage::entities::DomainTotals;

use super::events::{TrackerCommand, TrackerEvent};

/// Something able to tell a running tracker to drop its in-memory state.
#[async_trait]
pub trait TrackerControl: Send + Sync {
    async fn reset_tracking(&self) -> Result<()>;
}

/// In-process sender side of the tracker loop.
#[derive(Clone)]
pub struct TrackerHandle {
    sender: mpsc::Sender<TrackerEvent>,
}

impl TrackerHandle {
    pub fn new(sender: mpsc::Sender<TrackerEvent>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: TrackerEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| anyhow!("Tracker has stopped"))
    }

    pub async fn get_time_data(&self) -> Result<DomainTotals> {
        let (respond, response) = oneshot::channel();
        self.send(TrackerEvent::Command(TrackerCommand::GetTimeData(respond)))
            .await?;
        response
            .await
            .map_err(|_| anyhow!("Tracker dropped the request"))?
    }
}

#[async_trait]
impl TrackerControl for TrackerHandle {
    async fn reset_tracking(&self) -> Result<()> {
        let (respond, response) = oneshot::channel();
        self.send(TrackerEvent::Command(TrackerCommand::ResetTimeTracking(
            respond,
        )))
        .await?;
        response
            .await
            .map_err(|_| anyhow!("Tracker dropped the request"))
    }
}
