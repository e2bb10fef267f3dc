//! Command-line and environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tmux_stat_core::config::resolve_state_dir;

pub const DEFAULT_PORT: u16 = 4319;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

const PORT_ENV: &str = "OTEL_RECEIVER_PORT";
const IDLE_TIMEOUT_ENV: &str = "OTEL_RECEIVER_IDLE_TIMEOUT";

#[derive(Parser, Debug)]
#[command(name = "tmux-stat-receiver")]
#[command(about = "OTLP/HTTP receiver mapping Codex telemetry to tmux-stat state")]
#[command(version)]
pub struct Args {
    /// Port to listen on (default: $OTEL_RECEIVER_PORT or 4319)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// State directory (default: $TMUX_STAT_STATE_DIR, $STATE_DIR or ~/.claude/tmux-stat)
    #[arg(long, short = 'd', value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Seconds without requests before the receiver exits
    #[arg(long, value_name = "SECS")]
    pub idle_timeout: Option<u64>,

    /// Seconds between idle checks
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CHECK_INTERVAL_SECS)]
    pub check_interval: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub state_dir: PathBuf,
    pub idle_timeout: Duration,
    pub check_interval: Duration,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, String> {
        let port = match args.port {
            Some(port) => port,
            None => env_parse(PORT_ENV)?.unwrap_or(DEFAULT_PORT),
        };
        let idle_secs = match args.idle_timeout {
            Some(secs) => secs,
            None => env_parse(IDLE_TIMEOUT_ENV)?.unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS),
        };
        let state_dir = resolve_state_dir(args.state_dir).map_err(|e| e.to_string())?;

        Ok(Config {
            port,
            state_dir,
            idle_timeout: Duration::from_secs(idle_secs),
            check_interval: Duration::from_secs(args.check_interval.max(1)),
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{name} is not a valid value: {value:?}")),
        _ => Ok(None),
    }
}
