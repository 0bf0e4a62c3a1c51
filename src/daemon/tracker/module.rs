use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    daemon::{
        events::{TrackerCommand, TrackerEvent},
        storage::domain_store::DomainStore,
    },
    host_api::registry::TabRegistry,
    utils::clock::Clock,
};

use super::TimeTracker;

enum Step {
    Event(TrackerEvent),
    Tick,
    Stop,
}

/// Drives a [TimeTracker] from host events and a fixed cadence tick. Events are handled one at a
/// time, each to completion, so the tracker never observes interleaved transitions.
pub struct TrackerModule<S: DomainStore> {
    receiver: mpsc::Receiver<TrackerEvent>,
    tracker: TimeTracker<TabRegistry, S>,
    registry: TabRegistry,
    shutdown: CancellationToken,
    tick_frequency: Duration,
    time_provider: Box<dyn Clock>,
}

impl<S: DomainStore> TrackerModule<S> {
    pub fn new(
        receiver: mpsc::Receiver<TrackerEvent>,
        store: S,
        shutdown: CancellationToken,
        tick_frequency: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        let registry = TabRegistry::new();
        Self {
            receiver,
            tracker: TimeTracker::new(registry.clone(), store),
            registry,
            shutdown,
            tick_frequency,
            time_provider,
        }
    }

    /// Executes the tracker event loop.
    pub async fn run(mut self) -> Result<()> {
        self.reload().await;

        let mut tick_point = self.time_provider.instant() + self.tick_frequency;
        loop {
            let step = tokio::select! {
                _ = self.shutdown.cancelled() => Step::Stop,
                event = self.receiver.recv() => event.map_or(Step::Stop, Step::Event),
                _ = self.time_provider.sleep_until(tick_point) => Step::Tick,
            };

            match step {
                Step::Event(event) => self.handle(event).await,
                Step::Tick => {
                    tick_point += self.tick_frequency;
                    let now = self.time_provider.time();
                    self.tracker.on_tick(now).await;
                }
                Step::Stop => break,
            }
        }

        // The last partial interval would be lost otherwise.
        let now = self.time_provider.time();
        self.tracker.on_tick(now).await;
        self.receiver.close();
        info!("Tracker stopped");
        Ok(())
    }

    async fn reload(&mut self) {
        if let Err(e) = self.tracker.load().await {
            error!("Failed to load persisted totals {e:?}");
        }
    }

    async fn handle(&mut self, event: TrackerEvent) {
        debug!("Handling event {:?}", event);
        let now = self.time_provider.time();
        // The registry is updated after the tracker has seen the event, so that flushes caused by
        // the event still see the tab as it was before it.
        match event {
            TrackerEvent::TabActivated { tab_id, url } => {
                self.tracker.on_tab_activated(tab_id, now).await;
                self.registry.observe(tab_id, url.as_deref());
            }
            TrackerEvent::TabUpdated { tab_id, url } => {
                if url.is_some() {
                    self.tracker.on_tab_url_changed(tab_id, now).await;
                }
                self.registry.observe(tab_id, url.as_deref());
            }
            TrackerEvent::TabRemoved { tab_id } => {
                self.tracker.on_tab_removed(tab_id, now).await;
                self.registry.forget(tab_id);
            }
            TrackerEvent::Startup | TrackerEvent::Installed => self.reload().await,
            TrackerEvent::Command(TrackerCommand::GetTimeData(respond)) => {
                let data = self.tracker.persisted_totals().await;
                if respond.send(data).is_err() {
                    debug!("Requester of time data is gone");
                }
            }
            TrackerEvent::Command(TrackerCommand::ResetTimeTracking(respond)) => {
                self.tracker.reset();
                if respond.send(()).is_err() {
                    debug!("Requester of reset is gone");
                }
            }
        }
    }
}
