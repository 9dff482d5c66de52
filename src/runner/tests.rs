use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::args::PositiveUsize;
use crate::error::{AppError, ConfigError, HttpError, ValidationError};
use crate::http::test_support::spawn_status_server;
use crate::metrics::{ErrorEvent, ResponseTimeStats, RpsSnapshot};
use crate::spec::RawRequest;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn raw(verb: &str, url: &str) -> RawRequest {
    RawRequest {
        verb: verb.to_owned(),
        url: url.to_owned(),
        headers: BTreeMap::new(),
        body: None,
    }
}

fn config(duration: Duration, clients: usize) -> Result<RunConfig, String> {
    let num_clients =
        PositiveUsize::try_from(clients).map_err(|err| format!("clients: {}", err))?;
    Ok(
        RunConfig::new(PathBuf::from("requests.json"), duration, num_clients)
            .with_tick_interval(Duration::from_millis(20)),
    )
}

#[derive(Default)]
struct Collected {
    rps: Vec<RpsSnapshot>,
    samples: Vec<u64>,
    stats: Vec<ResponseTimeStats>,
    errors: Vec<ErrorEvent>,
    counts: Vec<u64>,
}

async fn collect(outputs: RunOutputs) -> Collected {
    let RunOutputs {
        mut rps,
        mut response_times,
        mut response_stats,
        mut errors,
        mut error_count,
    } = outputs;
    let rps_task = tokio::spawn(async move {
        let mut values = Vec::new();
        while let Some(value) = rps.recv().await {
            values.push(value);
        }
        values
    });
    let samples_task = tokio::spawn(async move {
        let mut values = Vec::new();
        while let Some(value) = response_times.recv().await {
            values.push(value);
        }
        values
    });
    let stats_task = tokio::spawn(async move {
        let mut values = Vec::new();
        while let Some(value) = response_stats.recv().await {
            values.push(value);
        }
        values
    });
    let errors_task = tokio::spawn(async move {
        let mut values = Vec::new();
        while let Some(value) = errors.recv().await {
            values.push(value);
        }
        values
    });
    let counts_task = tokio::spawn(async move {
        let mut values = Vec::new();
        while let Some(value) = error_count.recv().await {
            values.push(value);
        }
        values
    });
    Collected {
        rps: rps_task.await.unwrap_or_default(),
        samples: samples_task.await.unwrap_or_default(),
        stats: stats_task.await.unwrap_or_default(),
        errors: errors_task.await.unwrap_or_default(),
        counts: counts_task.await.unwrap_or_default(),
    }
}

fn totals(rps: &[RpsSnapshot]) -> (u64, u64) {
    rps.iter().fold((0, 0), |(requests, responses), snapshot| {
        (
            requests.saturating_add(snapshot.requests),
            responses.saturating_add(snapshot.responses),
        )
    })
}

#[test]
fn from_raw_rejects_an_unusable_pool() -> Result<(), String> {
    let result = Runner::from_raw(
        config(Duration::from_secs(1), 1)?,
        vec![raw("PATCH", "http://127.0.0.1:1/"), raw("get", "http://127.0.0.1:1/")],
    );
    match result {
        Err(AppError::Config(ConfigError::EmptyTemplateSet { total: 2 })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected an empty-pool error".to_owned()),
    }
}

#[test]
fn from_raw_keeps_valid_templates() -> Result<(), String> {
    let runner = Runner::from_raw(
        config(Duration::from_secs(1), 1)?,
        vec![raw("PATCH", "http://127.0.0.1:1/"), raw("GET", "http://127.0.0.1:1/")],
    )
    .map_err(|err| format!("from_raw: {}", err))?;
    if runner.templates().len() != 1 {
        return Err(format!("Expected 1 template, got {}", runner.templates().len()));
    }
    Ok(())
}

#[test]
fn start_requires_a_runtime() -> Result<(), String> {
    let runner = Runner::from_raw(
        config(Duration::from_secs(1), 1)?,
        vec![raw("GET", "http://127.0.0.1:1/")],
    )
    .map_err(|err| format!("from_raw: {}", err))?;
    match runner.start() {
        Err(AppError::Http(HttpError::NoRuntime)) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected start to fail outside a runtime".to_owned()),
    }
}

#[test]
fn start_rejects_a_zero_tick_interval() -> Result<(), String> {
    run_async_test(async {
        let config = config(Duration::from_secs(1), 1)?.with_tick_interval(Duration::ZERO);
        let runner = Runner::from_raw(config, vec![raw("GET", "http://127.0.0.1:1/")])
            .map_err(|err| format!("from_raw: {}", err))?;
        match runner.start() {
            Err(AppError::Validation(ValidationError::TickIntervalZero)) => Ok(()),
            Err(err) => Err(format!("Unexpected error: {}", err)),
            Ok(_) => Err("Expected start to reject a zero tick interval".to_owned()),
        }
    })
}

#[test]
fn run_reaches_done_with_exact_totals() -> Result<(), String> {
    run_async_test(async {
        let base = spawn_status_server(200)?;
        let runner = Runner::from_raw(
            config(Duration::from_millis(300), 3)?,
            vec![raw("GET", &format!("{}/ok", base))],
        )
        .map_err(|err| format!("from_raw: {}", err))?;
        let mut handle = runner.start().map_err(|err| format!("start: {}", err))?;
        if handle.state() != RunState::Running {
            return Err(format!("Expected running, got {}", handle.state().as_str()));
        }
        let outputs = handle
            .take_outputs()
            .ok_or_else(|| "Outputs missing".to_owned())?;
        if handle.take_outputs().is_some() {
            return Err("Outputs handed out twice".to_owned());
        }

        let collected = collect(outputs).await;
        let done = handle.done();
        tokio::time::timeout(Duration::from_secs(5), done)
            .await
            .map_err(|_| "Done signal never resolved".to_owned())?;
        if handle.active_clients() != 0 {
            return Err(format!("{} clients still active", handle.active_clients()));
        }
        let report = tokio::time::timeout(Duration::from_secs(5), handle.wait())
            .await
            .map_err(|_| "Supervisor did not finish".to_owned())?
            .map_err(|err| format!("wait: {}", err))?;

        if report.state != RunState::Done || report.cancelled_early {
            return Err(format!("Unexpected report: {:?}", report));
        }
        if !report.task_failures.is_empty() {
            return Err(format!("Task failures: {:?}", report.task_failures));
        }
        let (requests, responses) = totals(&collected.rps);
        if requests != report.requests || responses != report.responses {
            return Err(format!(
                "RPS totals {}/{} differ from pulses {}/{}",
                requests, responses, report.requests, report.responses
            ));
        }
        if responses == 0 {
            return Err("Expected at least one response".to_owned());
        }
        let samples = u64::try_from(collected.samples.len()).unwrap_or(u64::MAX);
        if samples != responses {
            return Err(format!("{} samples for {} responses", samples, responses));
        }
        if collected.stats.is_empty() {
            return Err("Expected response time stats".to_owned());
        }
        if !collected.errors.is_empty() || !collected.counts.is_empty() {
            return Err(format!("Unexpected errors: {:?}", collected.errors));
        }
        Ok(())
    })
}

#[test]
fn non_2xx_responses_are_counted_as_errors() -> Result<(), String> {
    run_async_test(async {
        let base = spawn_status_server(500)?;
        let runner = Runner::from_raw(
            config(Duration::from_millis(200), 2)?,
            vec![raw("DELETE", &format!("{}/fail", base))],
        )
        .map_err(|err| format!("from_raw: {}", err))?;
        let mut handle = runner.start().map_err(|err| format!("start: {}", err))?;
        let outputs = handle
            .take_outputs()
            .ok_or_else(|| "Outputs missing".to_owned())?;
        let collected = collect(outputs).await;
        let report = handle.wait().await.map_err(|err| format!("wait: {}", err))?;

        let response_errors = collected
            .errors
            .iter()
            .filter(|event| matches!(event, ErrorEvent::Response(err) if err.status_code == 500))
            .count();
        let response_errors = u64::try_from(response_errors).unwrap_or(u64::MAX);
        if response_errors != report.responses {
            return Err(format!(
                "{} response errors for {} responses",
                response_errors, report.responses
            ));
        }
        if collected.counts.len() != collected.errors.len() {
            return Err("Error count and details diverged".to_owned());
        }
        if collected.counts.windows(2).any(|pair| matches!(pair, [a, b] if a >= b)) {
            return Err(format!("Error count not increasing: {:?}", collected.counts));
        }
        if collected.counts.last().copied()
            != Some(u64::try_from(collected.errors.len()).unwrap_or(u64::MAX))
        {
            return Err("Final error count mismatch".to_owned());
        }
        Ok(())
    })
}

#[test]
fn cancel_ends_the_run_early() -> Result<(), String> {
    run_async_test(async {
        let base = spawn_status_server(200)?;
        let runner = Runner::from_raw(
            config(Duration::from_secs(60), 2)?,
            vec![raw("GET", &base)],
        )
        .map_err(|err| format!("from_raw: {}", err))?;
        let mut handle = runner.start().map_err(|err| format!("start: {}", err))?;
        let outputs = handle
            .take_outputs()
            .ok_or_else(|| "Outputs missing".to_owned())?;
        let collector = tokio::spawn(collect(outputs));
        let cancel = handle.cancel_handle();

        tokio::time::sleep(Duration::from_millis(100)).await;
        if !cancel.cancel() {
            return Err("First cancel should flip the signal".to_owned());
        }
        if cancel.cancel() {
            return Err("Second cancel should be a no-op".to_owned());
        }
        let report = tokio::time::timeout(Duration::from_secs(5), handle.wait())
            .await
            .map_err(|_| "Run did not stop after cancel".to_owned())?
            .map_err(|err| format!("wait: {}", err))?;
        if !report.cancelled_early {
            return Err("Report should mark the early cancel".to_owned());
        }
        if report.elapsed >= Duration::from_secs(5) {
            return Err(format!("Cancel took too long: {:?}", report.elapsed));
        }
        let collected = collector
            .await
            .map_err(|err| format!("collector: {}", err))?;
        let (requests, _) = totals(&collected.rps);
        if requests != report.requests {
            return Err(format!("{} vs {} requests", requests, report.requests));
        }
        Ok(())
    })
}

#[test]
fn dropped_receivers_do_not_stall_the_run() -> Result<(), String> {
    run_async_test(async {
        let base = spawn_status_server(500)?;
        let runner = Runner::from_raw(
            config(Duration::from_millis(150), 2)?,
            vec![raw("GET", &base)],
        )
        .map_err(|err| format!("from_raw: {}", err))?;
        let mut handle = runner.start().map_err(|err| format!("start: {}", err))?;
        drop(handle.take_outputs());
        let report = tokio::time::timeout(Duration::from_secs(5), handle.wait())
            .await
            .map_err(|_| "Run stalled without consumers".to_owned())?
            .map_err(|err| format!("wait: {}", err))?;
        if report.state != RunState::Done {
            return Err(format!("Unexpected state {:?}", report.state));
        }
        Ok(())
    })
}
