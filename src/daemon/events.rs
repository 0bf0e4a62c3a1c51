use anyhow::Result;
use tokio::sync::oneshot;

use crate::{daemon::storage::entities::DomainTotals, host_api::TabId};

/// Everything the tracker loop reacts to, apart from its own tick.
#[derive(Debug)]
pub enum TrackerEvent {
    TabActivated { tab_id: TabId, url: Option<String> },
    /// `url` is only present when the update changed the url.
    TabUpdated { tab_id: TabId, url: Option<String> },
    TabRemoved { tab_id: TabId },
    Startup,
    Installed,
    Command(TrackerCommand),
}

/// Requests that expect an answer from the tracker.
#[derive(Debug)]
pub enum TrackerCommand {
    GetTimeData(oneshot::Sender<Result<DomainTotals>>),
    ResetTimeTracking(oneshot::Sender<()>),
}
