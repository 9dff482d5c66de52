use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{BlitzArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Values given on the
/// command line win.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut BlitzArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "req_spec")
        && let Some(req_spec) = config.req_spec.as_ref()
    {
        args.req_spec = Some(PathBuf::from(req_spec));
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = duration
            .to_duration()
            .map_err(|err| AppError::config(ConfigError::InvalidDuration { source: err }))?;
    }

    if !is_cli(matches, "num_clients")
        && let Some(num_clients) = config.num_clients
    {
        args.num_clients = ensure_positive_usize(num_clients, "num_clients")?;
    }

    if !is_cli(matches, "metrics_endpoint")
        && let Some(endpoint) = config.metrics_endpoint.as_ref()
    {
        args.metrics_endpoint = Some(endpoint.clone());
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
