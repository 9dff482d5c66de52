use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Env vars checked, in order, for an explicit filter.
const FILTER_ENV_VARS: [&str; 2] = ["BLITZ_LOG", "RUST_LOG"];

/// Filter used when no env var is set. The HTTP stack stays at `warn` so
/// per-connection chatter does not drown the run log.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{},hyper=warn,hyper_util=warn,reqwest=warn", level)
}

/// Picks the first non-empty override, else the default for `verbose`.
fn select_directives(verbose: bool, overrides: &[Option<String>]) -> String {
    overrides
        .iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| default_directives(verbose))
}

fn build_filter(verbose: bool, overrides: &[Option<String>]) -> EnvFilter {
    let directives = select_directives(verbose, overrides);
    EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid log filter '{}': {}", directives, err);
        EnvFilter::new(default_directives(verbose))
    })
}

pub fn init_logging(verbose: bool, no_color: bool) {
    let overrides = FILTER_ENV_VARS.map(|name| std::env::var(name).ok());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(build_filter(verbose, &overrides))
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
