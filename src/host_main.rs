use anyhow::Result;
use clap::Parser;
use tabtally::{
    daemon::{args::HostArgs, start_host},
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, HOST_PREFIX},
        runtime::single_thread_runtime,
    },
};
use tracing::{error, info};

fn main() -> Result<()> {
    let args = HostArgs::parse();
    let app_dir = resolve_application_path(args.dir)?;
    enable_logging(HOST_PREFIX, &app_dir, args.log, args.log_stderr)?;
    info!("Host launched with {:?}", args.browser_args);

    let runtime = single_thread_runtime()?;
    let result = runtime.block_on(start_host(app_dir));
    // A blocked stdin read would keep the process alive after Ctrl-C otherwise.
    runtime.shutdown_background();

    result.inspect_err(|e| error!("Host stopped with an error {e:?}"))
}
