use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "tabtally-host", version)]
#[command(about = "Native messaging host that tracks time spent per website domain")]
pub struct HostArgs {
    #[arg(
        long,
        help = "Application directory. By default uses $XDG_STATE_HOME/tabtally or $HOME/.local/state/tabtally"
    )]
    pub dir: Option<PathBuf>,
    /// Mirrors logs to stderr. Stdout is reserved for the browser.
    #[arg(long = "log-stderr")]
    pub log_stderr: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
    /// The browser appends the caller origin (and on Windows a parent window handle) when it
    /// launches the host.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub browser_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::HostArgs;

    #[test]
    fn test_accepts_browser_launch_arguments() {
        let args = HostArgs::parse_from([
            "tabtally-host",
            "--log-stderr",
            "chrome-extension://abcdefghijklmnop/",
            "--parent-window=0",
        ]);
        assert!(args.log_stderr);
        assert_eq!(
            args.browser_args,
            vec!["chrome-extension://abcdefghijklmnop/", "--parent-window=0"]
        );
    }
}
