pub mod control;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use control::ControlClient;
use report::{process_report_command, ReportCommand};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    daemon::storage::domain_store::JsonFileStore,
    display::DisplayAdapter,
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Tabtally", version, long_about = None)]
#[command(about = "Shows how much time you spend on each website", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME/tabtally or $HOME/.local/state/tabtally"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display time spent per domain as a list and a chart")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Clear all tracked time and reset the running tracker")]
    Reset {},
    #[command(about = "Print tracked time as json")]
    Data {
        #[arg(long, help = "Ask the running tracker instead of reading the store directly")]
        live: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = resolve_application_path(args.dir)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;

    let adapter = DisplayAdapter::new(JsonFileStore::new(&dir)?, ControlClient::new(&dir));

    match args.commands {
        Commands::Report { command } => process_report_command(command, &adapter).await,
        Commands::Reset {} => {
            adapter.reset().await?;
            println!("Storage cleared and time tracking reset");
            Ok(())
        }
        Commands::Data { live } => {
            let live_data = if live {
                ControlClient::new(&dir).get_time_data().await?
            } else {
                None
            };
            let totals = match live_data {
                Some(totals) => totals,
                None => {
                    if live {
                        info!("No tracker is running, reading the store");
                    }
                    adapter.get_all_totals().await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&totals)?);
            Ok(())
        }
    }
}
