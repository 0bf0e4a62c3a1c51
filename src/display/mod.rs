//! The foreground side: reads what the tracker persisted, decides what is worth showing and
//! issues the reset command.

pub mod format;
pub mod refresh;
pub mod render;

use anyhow::Result;
use tracing::info;

use crate::daemon::{
    handle::TrackerControl,
    storage::{domain_store::DomainStore, entities::DomainTotals},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain: String,
    pub seconds: u64,
}

/// Domains that never make it to the display. The browser's own pages are tracked like any other
/// tab, they're just not interesting to look at.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    excluded_prefixes: Vec<String>,
    excluded_domains: Vec<String>,
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self {
            excluded_prefixes: vec!["chrome://".into(), "chrome-extension://".into()],
            excluded_domains: vec!["newtab".into()],
        }
    }
}

impl DomainFilter {
    pub fn is_visible(&self, domain: &str, seconds: u64) -> bool {
        seconds > 0
            && !self
                .excluded_prefixes
                .iter()
                .any(|prefix| domain.starts_with(prefix.as_str()))
            && !self.excluded_domains.iter().any(|d| d == domain)
    }

    /// Visible entries, most time first. Ties are ordered by domain so the output is stable
    /// between refreshes.
    pub fn visible_entries(&self, totals: &DomainTotals) -> Vec<DomainEntry> {
        let mut entries = totals
            .iter()
            .filter(|(domain, seconds)| self.is_visible(domain, **seconds))
            .map(|(domain, seconds)| DomainEntry {
                domain: domain.clone(),
                seconds: *seconds,
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.domain.cmp(&b.domain)));
        entries
    }
}

pub struct DisplayAdapter<S, C> {
    store: S,
    tracker: C,
    filter: DomainFilter,
}

impl<S: DomainStore, C: TrackerControl> DisplayAdapter<S, C> {
    pub fn new(store: S, tracker: C) -> Self {
        Self {
            store,
            tracker,
            filter: DomainFilter::default(),
        }
    }

    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    pub async fn get_all_totals(&self) -> Result<DomainTotals> {
        self.store.get_all().await
    }

    /// Clears the persisted totals and then the tracker's memory. A tick can flush the tracker's
    /// old total while the reset signal is on its way, so the store is cleared again once the
    /// tracker has confirmed.
    pub async fn reset(&self) -> Result<()> {
        self.store.clear().await?;
        info!("Storage cleared");
        self.tracker.reset_tracking().await?;
        self.store.clear().await?;
        info!("Time tracking reset");
        Ok(())
    }
}
