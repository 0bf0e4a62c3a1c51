use anyhow::Result;
use clap::Parser;
use tracing::error;

use crate::{
    daemon::{handle::TrackerControl, storage::domain_store::DomainStore},
    display::{
        format::format_time,
        refresh::{ChartRefresh, ChartRefresher, LIST_REFRESH},
        render::{render_chart, render_list, EMPTY_STATE},
        DisplayAdapter, DomainEntry,
    },
};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(short, long, help = "Keep the report open, refreshing the list every second")]
    watch: bool,
    #[arg(
        long,
        value_enum,
        default_value_t = ChartRefresh::MinuteChange,
        help = "When the chart is redrawn in watch mode"
    )]
    chart_refresh: ChartRefresh,
    #[arg(long, default_value_t = 40, help = "Width of the longest chart bar")]
    width: usize,
    #[arg(long = "no-color", help = "Don't colour the chart")]
    no_color: bool,
}

/// Command to process `report` command. Prints the time spent per domain once, or keeps
/// refreshing it with `--watch`.
pub async fn process_report_command<S: DomainStore, C: TrackerControl>(
    command: ReportCommand,
    adapter: &DisplayAdapter<S, C>,
) -> Result<()> {
    if command.watch {
        return watch_report(command, adapter).await;
    }

    let totals = adapter.get_all_totals().await?;
    let entries = adapter.filter().visible_entries(&totals);
    let chart = render_chart(&entries, command.width, !command.no_color);
    print!("{}", render_report(&entries, &chart));
    Ok(())
}

/// Runs until Ctrl-C. The list is redrawn on every refresh, the chart only when the
/// [ChartRefresher] says so and is otherwise reused from the previous draw.
async fn watch_report<S: DomainStore, C: TrackerControl>(
    command: ReportCommand,
    adapter: &DisplayAdapter<S, C>,
) -> Result<()> {
    let mut refresher = ChartRefresher::new(command.chart_refresh);
    let mut interval = tokio::time::interval(LIST_REFRESH);
    let mut chart = String::new();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => return Ok(()),
            instant = interval.tick() => {
                let totals = match adapter.get_all_totals().await {
                    Ok(totals) => totals,
                    Err(e) => {
                        error!("Failed to read totals {e:?}");
                        continue;
                    }
                };
                let entries = adapter.filter().visible_entries(&totals);
                if refresher.should_redraw(&totals, instant) {
                    chart = render_chart(&entries, command.width, !command.no_color);
                }
                print!("{CLEAR_SCREEN}{}", render_report(&entries, &chart));
            }
        }
    }
}

fn render_report(entries: &[DomainEntry], chart: &str) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_STATE}\n");
    }
    let total = entries.iter().map(|e| e.seconds).sum::<u64>();
    format!(
        "Total: {}\n\n{}\n{}",
        format_time(total),
        render_list(entries),
        chart
    )
}
