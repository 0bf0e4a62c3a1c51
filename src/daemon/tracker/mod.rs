//! The active-tab time accumulation state machine. [TimeTracker] owns the tracking session and
//! an in-memory mirror of the persisted totals; [module::TrackerModule] drives it from host
//! events and a periodic tick.

pub mod module;

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error, info, trace, warn};

use crate::{
    daemon::storage::{domain_store::DomainStore, entities::DomainTotals},
    host_api::{domain::resolve_domain, TabHost, TabId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Tracking {
        tab_id: TabId,
        start_time: DateTime<Utc>,
    },
}

/// What a single flush ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Elapsed whole seconds were added to `domain`, which now totals `total`.
    Credited {
        domain: String,
        seconds: u64,
        total: u64,
    },
    /// There was no start time yet. It has been set to the flush moment.
    StartEstablished,
    InvalidTab,
    /// The tab couldn't be looked up, usually because it was closed in the meantime.
    TabUnavailable,
    /// The tab has no url or the url has no host.
    NoDomain,
}

pub struct TimeTracker<H, S> {
    host: H,
    store: S,
    totals: DomainTotals,
    active_tab: Option<TabId>,
    start_time: Option<DateTime<Utc>>,
}

impl<H: TabHost, S: DomainStore> TimeTracker<H, S> {
    pub fn new(host: H, store: S) -> Self {
        Self {
            host,
            store,
            totals: DomainTotals::new(),
            active_tab: None,
            start_time: None,
        }
    }

    /// Repopulates the in-memory mirror from the persisted store. Without it the first flush
    /// after a restart would overwrite persisted totals with values counted from zero.
    pub async fn load(&mut self) -> Result<()> {
        self.totals = self.store.get_all().await?;
        info!("Loaded totals for {} domains", self.totals.len());
        Ok(())
    }

    pub fn state(&self) -> TrackerState {
        match (self.active_tab, self.start_time) {
            (Some(tab_id), Some(start_time)) => TrackerState::Tracking { tab_id, start_time },
            _ => TrackerState::Idle,
        }
    }

    pub fn totals(&self) -> &DomainTotals {
        &self.totals
    }

    /// Reads the persisted store, which is what callers asking for time data receive.
    pub async fn persisted_totals(&self) -> Result<DomainTotals> {
        self.store.get_all().await
    }

    pub async fn on_tab_activated(&mut self, tab_id: TabId, now: DateTime<Utc>) {
        if let Some(previous) = self.active_tab {
            self.flush(previous, now).await;
        }

        if !tab_id.is_valid() {
            // Focus moved somewhere that can't be tracked.
            warn!("Activated tab has invalid id {tab_id}, stopping tracking");
            self.active_tab = None;
            self.start_time = None;
            return;
        }

        debug!("Tracking tab {tab_id}");
        self.active_tab = Some(tab_id);
        self.start_time = Some(now);
    }

    /// Handles a tab navigating to a new url. Only the tracked tab matters.
    pub async fn on_tab_url_changed(&mut self, tab_id: TabId, now: DateTime<Utc>) {
        if self.active_tab != Some(tab_id) {
            return;
        }
        self.flush(tab_id, now).await;
        self.start_time = Some(now);
    }

    /// Flushes the tracked tab. The start time only moves forward by the credited whole seconds,
    /// so the sub-second remainder counts towards the next tick.
    pub async fn on_tick(&mut self, now: DateTime<Utc>) {
        let (Some(tab_id), Some(start_time)) = (self.active_tab, self.start_time) else {
            return;
        };
        let next_start = match self.flush(tab_id, now).await {
            FlushOutcome::Credited { seconds, .. } if start_time <= now => {
                start_time + TimeDelta::seconds(seconds as i64)
            }
            _ => now,
        };
        self.start_time = Some(next_start);
    }

    pub async fn on_tab_removed(&mut self, tab_id: TabId, now: DateTime<Utc>) {
        if self.active_tab != Some(tab_id) {
            return;
        }
        self.flush(tab_id, now).await;
        debug!("Tracked tab {tab_id} was removed");
        self.active_tab = None;
        self.start_time = None;
    }

    /// Stops tracking and forgets every in-memory total. The persisted store is the caller's
    /// responsibility and has to be cleared before this is called.
    pub fn reset(&mut self) {
        self.active_tab = None;
        self.start_time = None;
        self.totals.clear();
        info!("Time tracking reset");
    }

    /// Converts the time elapsed since the start time into seconds credited to the domain the tab
    /// is currently on. Never fails: every problem degrades to skipping this update.
    pub async fn flush(&mut self, tab_id: TabId, now: DateTime<Utc>) -> FlushOutcome {
        if !tab_id.is_valid() {
            warn!("Invalid tab id: {tab_id}");
            return FlushOutcome::InvalidTab;
        }

        let Some(start_time) = self.start_time else {
            self.start_time = Some(now);
            return FlushOutcome::StartEstablished;
        };

        let elapsed_ms = (now - start_time).num_milliseconds().max(0) as u64;

        let tab = match self.host.get_tab(tab_id).await {
            Ok(tab) => tab,
            Err(e) => {
                debug!("Skipping flush, couldn't get tab {tab_id}: {e}");
                return FlushOutcome::TabUnavailable;
            }
        };

        let Some(domain) = tab.url.as_deref().and_then(resolve_domain) else {
            trace!("Tab {tab_id} has no domain {:?}", tab.url);
            return FlushOutcome::NoDomain;
        };

        let seconds = elapsed_ms / 1000;
        let total = self.totals.entry(domain.clone()).or_insert(0);
        *total += seconds;
        let total = *total;

        if seconds > 0 {
            match self.store.set(&domain, total).await {
                Ok(_) => trace!("Updated time for {domain}: {total} seconds"),
                Err(e) => error!("Failed to persist time for {domain}: {e:?}"),
            }
        }

        FlushOutcome::Credited {
            domain,
            seconds,
            total,
        }
    }
}
