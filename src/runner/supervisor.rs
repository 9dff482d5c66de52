use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info};

use crate::http::WorkerStats;
use crate::metrics::{CountersHandle, ErrorOutputs, ResponseTimeOutputs};
use crate::shutdown::{CancelHandle, wait_for_shutdown};

use super::RunState;
use super::handle::RunReport;

pub(super) struct WorkerSet {
    handles: Vec<(usize, JoinHandle<WorkerStats>)>,
}

impl WorkerSet {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, id: usize, handle: JoinHandle<WorkerStats>) {
        self.handles.push((id, handle));
    }
}

/// Owns every task of a run and drives the state machine to `Done`.
pub(super) struct Supervisor {
    pub(super) cancel: CancelHandle,
    pub(super) state_tx: watch::Sender<RunState>,
    pub(super) started: Instant,
    pub(super) deadline: Option<Instant>,
    pub(super) workers: WorkerSet,
    pub(super) counters: CountersHandle,
    pub(super) response_time: JoinHandle<ResponseTimeOutputs>,
    pub(super) errors: JoinHandle<ErrorOutputs>,
}

impl Supervisor {
    pub(super) async fn run(self) -> RunReport {
        let Supervisor {
            cancel,
            state_tx,
            started,
            deadline,
            workers,
            counters,
            response_time,
            errors,
        } = self;

        let mut shutdown_rx = cancel.subscribe();
        let cancelled_early = tokio::select! {
            () = wait_for_deadline(deadline) => false,
            () = wait_for_shutdown(&mut shutdown_rx) => true,
        };
        if cancelled_early {
            info!("Run cancelled after {:?}; draining.", started.elapsed());
        } else {
            info!("Run deadline reached; draining.");
        }
        cancel.cancel();
        state_tx.send_replace(RunState::Draining);

        let mut failures = Vec::new();
        let mut iterations: u64 = 0;
        for (id, handle) in workers.handles {
            match handle.await {
                Ok(stats) => iterations = iterations.saturating_add(stats.iterations),
                Err(err) => record_failure(&mut failures, &format!("client {}", id), &err),
            }
        }
        debug!("All clients exited after {} iterations.", iterations);

        let requests = join_or_record(counters.request_counter, "request counter", &mut failures)
            .await
            .unwrap_or(0);
        let responses =
            join_or_record(counters.response_counter, "response counter", &mut failures)
                .await
                .unwrap_or(0);
        let rps_tx = join_or_record(counters.emitter, "rps emitter", &mut failures).await;
        let response_time_outputs =
            join_or_record(response_time, "response time aggregator", &mut failures).await;
        let error_outputs = join_or_record(errors, "error aggregator", &mut failures).await;

        // Pass-through queues close first, then the derived ones.
        let (samples_tx, stats_tx) = response_time_outputs
            .map(|outputs| (outputs.samples_tx, outputs.stats_tx))
            .unzip();
        let (count_tx, details_tx) = error_outputs
            .map(|outputs| (outputs.count_tx, outputs.details_tx))
            .unzip();
        drop(samples_tx);
        drop(details_tx);
        drop(rps_tx);
        drop(stats_tx);
        drop(count_tx);

        let elapsed = started.elapsed();
        state_tx.send_replace(RunState::Done);
        info!(
            "Run finished in {:?}: {} requests, {} responses",
            elapsed, requests, responses
        );

        RunReport {
            state: RunState::Done,
            elapsed,
            cancelled_early,
            requests,
            responses,
            task_failures: failures,
        }
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

async fn join_or_record<T>(
    handle: JoinHandle<T>,
    name: &str,
    failures: &mut Vec<String>,
) -> Option<T> {
    match handle.await {
        Ok(value) => Some(value),
        Err(err) => {
            record_failure(failures, name, &err);
            None
        }
    }
}

fn record_failure(failures: &mut Vec<String>, name: &str, err: &JoinError) {
    let message = format!("{} task failed: {}", name, err);
    error!("{}", message);
    failures.push(message);
}
