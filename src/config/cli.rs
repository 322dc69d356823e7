use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Origin of the site to harvest
    #[arg(long, env = "HARVEST_BASE_URL", default_value = "https://setscript.com")]
    pub base_url: String,

    /// Optional JSON file overriding the site markup settings
    #[arg(long, env = "HARVEST_SITE_CONFIG")]
    pub site_config: Option<PathBuf>,

    /// Directory holding the snapshot history
    #[arg(long, env = "HARVEST_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Address the read API listens on
    #[arg(long, env = "HARVEST_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Seconds between scheduled runs
    #[arg(long, env = "HARVEST_INTERVAL_SECS", default_value_t = 600)]
    pub interval_secs: u64,

    /// Upper bound on project pages fetched in one run
    #[arg(long, env = "HARVEST_MAX_PAGES", default_value_t = 200)]
    pub max_pages: usize,

    /// Pause between sequential project page fetches
    #[arg(long, env = "HARVEST_PAGE_DELAY_MS", default_value_t = 500)]
    pub page_delay_ms: u64,

    /// Timeout for a single HTTP request
    #[arg(long, env = "HARVEST_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Wall-clock bound for a whole run
    #[arg(long, env = "HARVEST_RUN_TIMEOUT_SECS", default_value_t = 300)]
    pub run_timeout_secs: u64,

    /// Number of snapshots retained in the history
    #[arg(long, env = "HARVEST_HISTORY_LIMIT", default_value_t = 100)]
    pub history_limit: usize,

    #[arg(long, env = "HARVEST_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Do not fire a run when the server starts
    #[arg(long)]
    pub no_initial_run: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the read API and trigger runs on an interval
    Serve,
    /// Execute one harvest run, persist it and exit
    Run,
    /// Print the latest stored snapshot
    Latest,
}
