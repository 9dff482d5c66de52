use std::time::Instant;

use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::metrics::{ErrorEvent, NetworkError, NetworkErrorKind, ResponseError};
use crate::shutdown::{ShutdownReceiver, is_shutdown};
use crate::spec::{RequestTemplate, TemplateSet};

use super::active::ActiveGuard;
use super::execution::{ResponseOutcome, execute, now_nanos};
use super::request::build_request;

/// Outbound queues of one client worker.
#[derive(Debug, Clone)]
pub struct WorkerChannels {
    pub requests_tx: mpsc::Sender<()>,
    pub responses_tx: mpsc::Sender<()>,
    pub samples_tx: mpsc::Sender<u64>,
    pub errors_tx: mpsc::Sender<ErrorEvent>,
}

/// What one worker did before it exited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub iterations: u64,
    pub network_errors: u64,
    pub response_errors: u64,
}

/// An aggregator went away; the worker has nowhere to report to.
struct QueueClosed;

impl<T> From<mpsc::error::SendError<T>> for QueueClosed {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        QueueClosed
    }
}

/// One simulated client issuing requests back to back until cancelled.
pub struct ClientWorker {
    id: usize,
    client: Client,
    templates: TemplateSet,
    channels: WorkerChannels,
    shutdown_rx: ShutdownReceiver,
    _active: ActiveGuard,
}

impl ClientWorker {
    #[must_use]
    pub const fn new(
        id: usize,
        client: Client,
        templates: TemplateSet,
        channels: WorkerChannels,
        shutdown_rx: ShutdownReceiver,
        active: ActiveGuard,
    ) -> Self {
        Self {
            id,
            client,
            templates,
            channels,
            shutdown_rx,
            _active: active,
        }
    }

    #[must_use]
    pub fn spawn(self) -> JoinHandle<WorkerStats> {
        tokio::spawn(self.run())
    }

    /// Runs the request loop. Cancellation is checked between iterations
    /// only, so a call already in flight always completes and is reported.
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::default();

        while !is_shutdown(&self.shutdown_rx) {
            let picked = {
                let mut rng = rand::thread_rng();
                self.templates.choose(&mut rng)
            };
            let Some(template) = picked else {
                break;
            };
            if self.iterate(template, &mut stats).await.is_err() {
                debug!("Client {} stopping: output queue closed.", self.id);
                break;
            }
            stats.iterations = stats.iterations.saturating_add(1);
        }

        debug!(
            "Client {} exited after {} iterations ({} network errors, {} response errors)",
            self.id, stats.iterations, stats.network_errors, stats.response_errors
        );
        stats
    }

    async fn iterate(
        &self,
        template: &RequestTemplate,
        stats: &mut WorkerStats,
    ) -> Result<(), QueueClosed> {
        let request = match build_request(&self.client, template) {
            Ok(request) => request,
            Err(err) => {
                stats.network_errors = stats.network_errors.saturating_add(1);
                let event = NetworkError {
                    timestamp_nanos: now_nanos(),
                    kind: NetworkErrorKind::Request,
                    message: err.to_string(),
                };
                self.channels
                    .errors_tx
                    .send(ErrorEvent::Network(event))
                    .await?;
                return Ok(());
            }
        };

        let timestamp_nanos = now_nanos();
        self.channels.requests_tx.send(()).await?;

        let started = Instant::now();
        let result = execute(&self.client, request).await;
        let response_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status_code = match result {
            Ok(status_code) => status_code,
            Err(err) => {
                stats.network_errors = stats.network_errors.saturating_add(1);
                let event = NetworkError::from_reqwest(timestamp_nanos, &err);
                self.channels
                    .errors_tx
                    .send(ErrorEvent::Network(event))
                    .await?;
                return Ok(());
            }
        };

        let outcome = ResponseOutcome {
            status_code,
            response_time_ms,
            timestamp_nanos,
        };
        self.channels.responses_tx.send(()).await?;
        self.channels.samples_tx.send(outcome.response_time_ms).await?;

        if !outcome.is_success() {
            stats.response_errors = stats.response_errors.saturating_add(1);
            let event = ResponseError {
                timestamp_nanos: outcome.timestamp_nanos,
                verb: template.verb,
                url: template.url.clone(),
                status_code: outcome.status_code,
            };
            self.channels
                .errors_tx
                .send(ErrorEvent::Response(event))
                .await?;
        }
        Ok(())
    }
}
