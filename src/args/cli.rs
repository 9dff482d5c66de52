use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::parsers::{parse_bool_env, parse_duration_arg, parse_positive_usize};
use super::types::PositiveUsize;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load generator: replays a pool of request templates with N clients and reports throughput, latency and errors."
)]
pub struct BlitzArgs {
    /// Path to the JSON request spec (array of {verb, url, headers, body})
    #[arg(long = "req-spec", short = 'r')]
    pub req_spec: Option<PathBuf>,

    /// Test duration with a unit: ms, s, m or h (e.g. 90s, 5m)
    #[arg(long, short = 'd', default_value = "1m", value_parser = parse_duration_arg)]
    pub duration: Duration,

    /// Number of concurrent clients
    #[arg(long = "num-clients", short = 'c', default_value = "1", value_parser = parse_positive_usize)]
    pub num_clients: PositiveUsize,

    /// Metrics endpoint of the target host (accepted, currently unused)
    #[arg(long = "metrics-endpoint", short = 'm')]
    pub metrics_endpoint: Option<String>,

    /// Path to config file (TOML/JSON). Defaults to ./blitz.toml or ./blitz.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by BLITZ_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
