use std::collections::VecDeque;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::metrics::LatencyHistogram;
use crate::runner::RunOutputs;

use super::summary::RunSummary;

/// Number of most recent error events kept for display.
pub const ERROR_LOG_CAPACITY: usize = 10;

/// Drains every output queue until all of them close, then waits for `done`.
///
/// Logs one line per RPS snapshot and folds everything else into the
/// returned summary.
pub async fn consume<F>(outputs: RunOutputs, done: F) -> RunSummary
where
    F: Future<Output = ()>,
{
    let RunOutputs {
        mut rps,
        mut response_times,
        mut response_stats,
        mut errors,
        mut error_count,
    } = outputs;

    let started = Instant::now();
    let mut summary = RunSummary::empty();
    let mut histogram = match LatencyHistogram::new() {
        Ok(histogram) => Some(histogram),
        Err(err) => {
            warn!("Percentiles disabled: {}", err);
            None
        }
    };
    let mut recent_errors = VecDeque::with_capacity(ERROR_LOG_CAPACITY);

    let mut rps_open = true;
    let mut samples_open = true;
    let mut stats_open = true;
    let mut errors_open = true;
    let mut count_open = true;

    while rps_open || samples_open || stats_open || errors_open || count_open {
        tokio::select! {
            snapshot = rps.recv(), if rps_open => match snapshot {
                Some(snapshot) => {
                    summary.ticks = summary.ticks.saturating_add(1);
                    summary.total_requests = summary.total_requests.saturating_add(snapshot.requests);
                    summary.total_responses =
                        summary.total_responses.saturating_add(snapshot.responses);
                    info!(
                        "{}s | requests/s: {} | responses/s: {} | errors: {}",
                        started.elapsed().as_secs(),
                        snapshot.requests,
                        snapshot.responses,
                        summary.error_count
                    );
                }
                None => rps_open = false,
            },
            sample = response_times.recv(), if samples_open => match sample {
                Some(sample_ms) => {
                    summary.samples = summary.samples.saturating_add(1);
                    if let Some(histogram) = histogram.as_mut()
                        && let Err(err) = histogram.record(sample_ms)
                    {
                        debug!("{}", err);
                    }
                }
                None => samples_open = false,
            },
            stats = response_stats.recv(), if stats_open => match stats {
                Some(stats) => summary.latest_stats = Some(stats),
                None => stats_open = false,
            },
            event = errors.recv(), if errors_open => match event {
                Some(event) => {
                    if recent_errors.len() >= ERROR_LOG_CAPACITY {
                        recent_errors.pop_front();
                    }
                    recent_errors.push_back(event);
                }
                None => errors_open = false,
            },
            count = error_count.recv(), if count_open => match count {
                Some(count) => summary.error_count = count,
                None => count_open = false,
            },
        }
    }

    done.await;
    summary.elapsed = started.elapsed();
    if let Some(histogram) = histogram.as_ref() {
        summary.percentiles = histogram.percentiles();
    }
    summary.recent_errors = recent_errors.into_iter().collect();
    summary
}
