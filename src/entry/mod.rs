use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::error;

use crate::app::{consume, summary_lines};
use crate::args::BlitzArgs;
use crate::config::{apply_config, find_config_in, load_config};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::runner::{RunConfig, Runner};
use crate::spec::load_template_set;
use crate::system::{logger::init_logging, shutdown_handlers::setup_signal_shutdown_handler};

/// Runs the CLI: parse, configure, load the request pool, drive one run and
/// print its summary.
///
/// # Errors
///
/// Returns an error for invalid arguments or config, an unusable request
/// spec, or task failures during the run.
pub fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<(BlitzArgs, ArgMatches)>> {
    let mut cmd = BlitzArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = BlitzArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    find_config_in(Path::new(".")).is_none()
}

fn build_run_config(args: &BlitzArgs) -> AppResult<RunConfig> {
    let request_spec_path = args
        .req_spec
        .clone()
        .ok_or(AppError::Config(ConfigError::MissingRequestSpec))?;
    Ok(
        RunConfig::new(request_spec_path, args.duration, args.num_clients)
            .with_metrics_endpoint(args.metrics_endpoint.clone()),
    )
}

async fn run_async(args: BlitzArgs) -> AppResult<()> {
    let run_config = build_run_config(&args)?;
    let (templates, _report) = load_template_set(&run_config.request_spec_path)?;

    let mut handle = Runner::new(run_config, templates).start()?;
    let signal_handle = setup_signal_shutdown_handler(&handle.cancel_handle());

    let summary = match handle.take_outputs() {
        Some(outputs) => Some(consume(outputs, handle.done()).await),
        None => {
            handle.done().await;
            None
        }
    };
    let report = handle.wait().await?;
    drop(signal_handle.await);

    if let Some(summary) = summary {
        println!();
        for line in summary_lines(&summary) {
            println!("{}", line);
        }
    }

    if !report.task_failures.is_empty() {
        for failure in &report.task_failures {
            error!("{}", failure);
        }
        return Err(AppError::validation(ValidationError::RuntimeErrors));
    }
    Ok(())
}
