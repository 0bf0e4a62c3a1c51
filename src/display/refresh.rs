use std::{fmt::Display, time::Duration};

use clap::ValueEnum;
use tokio::time::Instant;

use crate::daemon::storage::entities::{diff_totals, DomainTotals, StorageChange};

/// How often the list is redrawn, whether anything changed or not.
pub const LIST_REFRESH: Duration = Duration::from_secs(1);

pub const CHART_REFRESH: Duration = Duration::from_secs(60);

/// When the chart gets redrawn. Redrawing it costs more than the list and its labels only have
/// minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartRefresh {
    /// Redraw when some domain moved into another whole minute.
    MinuteChange,
    /// Redraw every [CHART_REFRESH].
    EveryMinute,
}

impl Display for ChartRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartRefresh::MinuteChange => write!(f, "minute-change"),
            ChartRefresh::EveryMinute => write!(f, "every-minute"),
        }
    }
}

/// Decides, snapshot by snapshot, whether the chart has to be redrawn.
pub struct ChartRefresher {
    policy: ChartRefresh,
    previous: Option<DomainTotals>,
    last_redraw: Option<Instant>,
}

impl ChartRefresher {
    pub fn new(policy: ChartRefresh) -> Self {
        Self {
            policy,
            previous: None,
            last_redraw: None,
        }
    }

    pub fn should_redraw(&mut self, current: &DomainTotals, now: Instant) -> bool {
        let redraw = match (&self.previous, self.last_redraw) {
            (Some(previous), Some(last_redraw)) => match self.policy {
                ChartRefresh::MinuteChange => {
                    let changes = diff_totals(previous, current);
                    // Entries disappear on reset, which has to show up even below a minute.
                    changes.iter().any(StorageChange::crosses_minute)
                        || changes.iter().any(|c| !current.contains_key(&c.domain))
                }
                ChartRefresh::EveryMinute => now.duration_since(last_redraw) >= CHART_REFRESH,
            },
            _ => true,
        };

        self.previous = Some(current.clone());
        if redraw {
            self.last_redraw = Some(now);
        }
        redraw
    }
}
