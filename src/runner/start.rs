use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::info;

use crate::error::{AppError, AppResult, ConfigError, HttpError, ValidationError};
use crate::http::{ActiveClients, ClientWorker, WorkerChannels, build_client};
use crate::metrics::{
    CounterInputs, ErrorOutputs, ResponseTimeOutputs, spawn_counters, spawn_error_aggregator,
    spawn_response_time_aggregator,
};
use crate::shutdown::{CancelHandle, shutdown_channel};
use crate::spec::{RawRequest, TemplateSet, validate_requests};

use super::handle::{RunHandle, RunOutputs};
use super::supervisor::{Supervisor, WorkerSet};
use super::{RunConfig, RunState};

/// A configured run that has not started yet.
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunConfig,
    templates: TemplateSet,
}

impl Runner {
    #[must_use]
    pub const fn new(config: RunConfig, templates: TemplateSet) -> Self {
        Self { config, templates }
    }

    /// Validates raw records and builds a runner from the survivors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyTemplateSet` when no record is usable.
    /// Nothing is spawned in that case.
    pub fn from_raw(config: RunConfig, raw: Vec<RawRequest>) -> AppResult<Self> {
        let (templates, report) = validate_requests(raw);
        if templates.is_empty() {
            return Err(AppError::config(ConfigError::EmptyTemplateSet {
                total: report.total,
            }));
        }
        Ok(Self::new(config, TemplateSet::new(templates)?))
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub const fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Opens every queue, spawns the aggregators, the workers and the
    /// supervisor, and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns an error when the tick interval is zero, when called outside a
    /// tokio runtime, or when the HTTP client cannot be built. Nothing is
    /// spawned in any of these cases.
    pub fn start(self) -> AppResult<RunHandle> {
        if self.config.tick_interval.is_zero() {
            return Err(AppError::validation(ValidationError::TickIntervalZero));
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AppError::http(HttpError::NoRuntime));
        }
        let Runner { config, templates } = self;
        let num_clients = config.num_clients.get();
        let client = build_client(num_clients)?;

        let (state_tx, state_rx) = watch::channel(RunState::Idle);
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let cancel = CancelHandle::new(Arc::new(shutdown_tx));

        let (requests_tx, requests_rx) = mpsc::channel::<()>(num_clients);
        let (responses_tx, responses_rx) = mpsc::channel::<()>(num_clients);
        let (samples_tx, samples_rx) = mpsc::channel::<u64>(num_clients);
        let (errors_tx, errors_rx) = mpsc::channel(num_clients);

        let (rps_tx, rps_rx) = mpsc::channel(num_clients);
        let (response_times_tx, response_times_rx) = mpsc::channel(num_clients);
        let (stats_tx, stats_rx) = mpsc::channel(num_clients);
        let (details_tx, details_rx) = mpsc::channel(num_clients);
        let (count_tx, count_rx) = mpsc::channel(num_clients);

        let counters = spawn_counters(
            CounterInputs {
                requests_rx,
                responses_rx,
            },
            rps_tx,
            config.tick_interval,
        );
        let response_time = spawn_response_time_aggregator(
            samples_rx,
            ResponseTimeOutputs {
                samples_tx: response_times_tx,
                stats_tx,
            },
        );
        let errors = spawn_error_aggregator(errors_rx, ErrorOutputs { count_tx, details_tx });

        let started = Instant::now();
        let deadline = started.checked_add(config.duration);
        state_tx.send_replace(RunState::Running);
        info!(
            "Starting run: {} clients, {} templates, duration {:?}",
            num_clients,
            templates.len(),
            config.duration
        );

        let active = ActiveClients::new();
        let channels = WorkerChannels {
            requests_tx,
            responses_tx,
            samples_tx,
            errors_tx,
        };
        let mut workers = WorkerSet::with_capacity(num_clients);
        for id in 0..num_clients {
            let worker = ClientWorker::new(
                id,
                client.clone(),
                templates.clone(),
                channels.clone(),
                cancel.subscribe(),
                active.enter(),
            );
            workers.push(id, worker.spawn());
        }
        // Workers now hold the only producer handles.
        drop(channels);
        drop(shutdown_rx);

        let supervisor = Supervisor {
            cancel: cancel.clone(),
            state_tx,
            started,
            deadline,
            workers,
            counters,
            response_time,
            errors,
        };

        Ok(RunHandle {
            outputs: Some(RunOutputs {
                rps: rps_rx,
                response_times: response_times_rx,
                response_stats: stats_rx,
                errors: details_rx,
                error_count: count_rx,
            }),
            cancel,
            state_rx,
            active,
            supervisor: tokio::spawn(supervisor.run()),
        })
    }
}
