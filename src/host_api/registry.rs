use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::trace;

use super::{Tab, TabHost, TabId};

/// [TabHost] backed by what the browser reported through tab events. The browser side only sends
/// events, so the registry keeps the last known url for every tab it has heard of.
#[derive(Clone, Default)]
pub struct TabRegistry {
    tabs: Arc<Mutex<HashMap<TabId, Option<Arc<str>>>>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a tab exists. A missing url keeps whatever was known before.
    pub fn observe(&self, tab_id: TabId, url: Option<&str>) {
        let mut tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        let entry = tabs.entry(tab_id).or_insert(None);
        if let Some(url) = url {
            trace!("Tab {tab_id} now at {url}");
            *entry = Some(url.into());
        }
    }

    pub fn forget(&self, tab_id: TabId) {
        let mut tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        tabs.remove(&tab_id);
    }
}

#[async_trait]
impl TabHost for TabRegistry {
    async fn get_tab(&self, tab_id: TabId) -> Result<Tab> {
        let tabs = self.tabs.lock().unwrap_or_else(|e| e.into_inner());
        tabs.get(&tab_id)
            .map(|url| Tab {
                id: tab_id,
                url: url.clone(),
            })
            .ok_or_else(|| anyhow!("No tab with id: {tab_id}"))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::host_api::{TabHost, TabId};

    use super::TabRegistry;

    #[tokio::test]
    async fn test_registry_tracks_urls() -> Result<()> {
        let registry = TabRegistry::new();
        registry.observe(TabId(3), Some("https://example.com"));
        registry.observe(TabId(3), None);

        let tab = registry.get_tab(TabId(3)).await?;
        assert_eq!(tab.url.as_deref(), Some("https://example.com"));

        registry.observe(TabId(3), Some("https://other.org"));
        let tab = registry.get_tab(TabId(3)).await?;
        assert_eq!(tab.url.as_deref(), Some("https://other.org"));
        Ok(())
    }

    #[tokio::test]
    async fn test_registry_forgets_removed_tabs() {
        let registry = TabRegistry::new();
        registry.observe(TabId(1), None);
        assert!(registry.get_tab(TabId(1)).await.is_ok());

        registry.forget(TabId(1));
        assert!(registry.get_tab(TabId(1)).await.is_err());
        assert!(registry.get_tab(TabId(7)).await.is_err());
    }
}
