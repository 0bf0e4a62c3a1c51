//! Contains the contract between the tracker and the browser it observes.
//! [TabHost] is the main artifact of this module: it abstracts tab lookups so the tracker can be
//! driven by the native messaging host in production and by mocks in tests.

pub mod domain;
pub mod registry;

use std::{fmt::Display, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifier of a browser tab. The browser never assigns `0` and uses `-1` to mean "no tab", so
/// only strictly positive ids refer to an actual tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i32);

impl TabId {
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    /// Url currently loaded in the tab. For example 'https://example.com/a?b=c'. Missing when the
    /// browser hasn't reported it yet.
    pub url: Option<Arc<str>>,
}

/// Lookup of tabs in the host browser. A failed lookup means the tab is gone, which is an expected
/// outcome when a tab is closed while a flush is pending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn get_tab(&self, tab_id: TabId) -> Result<Tab>;
}
