use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::fs::operations::{read_shared, rewrite_exclusive};

use super::entities::DomainTotals;

pub const STORE_FILE_NAME: &str = "totals.json";

/// Interface for abstracting the persisted key-value store of domain totals.
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Retrieves every persisted entry.
    async fn get_all(&self) -> Result<DomainTotals>;

    /// Overwrites the total of a single domain, leaving other entries untouched.
    async fn set(&self, domain: &str, seconds: u64) -> Result<()>;

    /// Removes every entry.
    async fn clear(&self) -> Result<()>;
}

/// The main realization of [DomainStore].
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(STORE_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_totals(path: &Path, contents: &str) -> DomainTotals {
    if contents.trim().is_empty() {
        return DomainTotals::new();
    }
    match serde_json::from_str::<DomainTotals>(contents) {
        Ok(totals) => totals,
        Err(e) => {
            // Might happen if the file was edited by hand or cut off mid-write. Losing the totals
            // is preferable to stopping the tracking altogether.
            warn!("Store at {path:?} contains illegal json, treating it as empty: {e}");
            DomainTotals::new()
        }
    }
}

#[async_trait]
impl DomainStore for JsonFileStore {
    async fn get_all(&self) -> Result<DomainTotals> {
        debug!("Reading {:?}", self.path);
        let contents = read_shared(&self.path).await?;
        Ok(contents
            .map(|contents| parse_totals(&self.path, &contents))
            .unwrap_or_default())
    }

    async fn set(&self, domain: &str, seconds: u64) -> Result<()> {
        rewrite_exclusive(&self.path, |previous| {
            let mut totals = parse_totals(&self.path, &previous);
            totals.insert(domain.to_string(), seconds);
            Ok(serde_json::to_string(&totals)?)
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        rewrite_exclusive(&self.path, |_| Ok("{}".into())).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::daemon::storage::entities::DomainTotals;

    use super::{DomainStore, JsonFileStore};

    #[tokio::test]
    async fn test_store_empty_without_file() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path())?;
        assert!(store.get_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_set_and_reopen() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path())?;
        store.set("example.com", 5).await?;
        store.set("other.org", 12).await?;
        store.set("example.com", 9).await?;

        let reopened = JsonFileStore::new(dir.path())?;
        let totals = reopened.get_all().await?;

        assert_eq!(
            totals,
            DomainTotals::from([("example.com".into(), 9), ("other.org".into(), 12)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_store_clear() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path())?;
        store.set("example.com", 5).await?;
        store.clear().await?;

        assert!(store.get_all().await?.is_empty());

        store.set("other.org", 1).await?;
        assert_eq!(
            store.get_all().await?,
            DomainTotals::from([("other.org".into(), 1)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_store_recovers_from_corruption() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::new(dir.path())?;
        std::fs::write(store.path(), "{\"example.com\": 4")?;

        assert!(store.get_all().await?.is_empty());

        store.set("example.com", 7).await?;
        assert_eq!(
            store.get_all().await?,
            DomainTotals::from([("example.com".into(), 7)])
        );
        Ok(())
    }
}
