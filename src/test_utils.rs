use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

use crate::{
    daemon::storage::{domain_store::DomainStore, entities::DomainTotals},
    utils::clock::Clock,
};

/// [DomainStore] kept entirely in memory. Clones share the same entries so a test can keep one
/// to inspect what the tracker persisted.
#[derive(Clone, Default)]
pub struct MemoryStore {
    totals: Arc<Mutex<DomainTotals>>,
}

impl MemoryStore {
    pub fn snapshot(&self) -> DomainTotals {
        self.totals.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn get_all(&self) -> Result<DomainTotals> {
        Ok(self.snapshot())
    }

    async fn set(&self, domain: &str, seconds: u64) -> Result<()> {
        self.totals.lock().unwrap().insert(domain.into(), seconds);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.totals.lock().unwrap().clear();
        Ok(())
    }
}

/// Wall-clock time follows tokio's clock, so it moves with `start_paused` tests, and can also be
/// pushed forward by hand.
#[derive(Clone)]
pub struct TestClock {
    start_time: DateTime<Utc>,
    reference: Instant,
    offset: Arc<Mutex<TimeDelta>>,
}

impl TestClock {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            reference: Instant::now(),
            offset: Arc::new(Mutex::new(TimeDelta::zero())),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.offset.lock().unwrap() += by;
    }
}

#[async_trait]
impl Clock for TestClock {
    fn time(&self) -> DateTime<Utc> {
        self.start_time + self.reference.elapsed() + *self.offset.lock().unwrap()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}
