use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ResponseTimeStats;
use super::output::Output;

/// Running count/sum/min/max over every latency sample of a run.
///
/// Owned by exactly one task; no synchronization is needed.
#[derive(Debug, Clone)]
pub struct ResponseTimeAggregator {
    count: u64,
    sum_ms: u128,
    max_ms: u64,
    min_ms: u64,
    last_emitted: Option<ResponseTimeStats>,
}

impl Default for ResponseTimeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseTimeAggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            sum_ms: 0,
            max_ms: 0,
            min_ms: u64::MAX,
            last_emitted: None,
        }
    }

    /// Folds one sample in and returns the new stats when they differ from the
    /// last returned tuple.
    pub fn observe(&mut self, sample_ms: u64) -> Option<ResponseTimeStats> {
        self.count = self.count.saturating_add(1);
        self.sum_ms = self.sum_ms.saturating_add(u128::from(sample_ms));
        self.max_ms = self.max_ms.max(sample_ms);
        self.min_ms = self.min_ms.min(sample_ms);

        let stats = self.current()?;
        if self.last_emitted == Some(stats) {
            return None;
        }
        self.last_emitted = Some(stats);
        Some(stats)
    }

    /// Current aggregates, or `None` before the first sample. The initial
    /// `u64::MAX` minimum is never exposed.
    #[must_use]
    pub fn current(&self) -> Option<ResponseTimeStats> {
        let average = self.sum_ms.checked_div(u128::from(self.count))?;
        Some(ResponseTimeStats {
            average_ms: u64::try_from(average).unwrap_or(u64::MAX),
            max_ms: self.max_ms,
            min_ms: self.min_ms,
        })
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn sum_ms(&self) -> u128 {
        self.sum_ms
    }
}

/// Outbound queues of the response-time aggregator.
pub struct ResponseTimeOutputs {
    /// Every raw sample, unchanged, in arrival order.
    pub samples_tx: mpsc::Sender<u64>,
    /// Coalesced stats, sent only when the tuple changes.
    pub stats_tx: mpsc::Sender<ResponseTimeStats>,
}

/// Spawns the response-time aggregator. It drains `samples_rx` until every
/// worker has dropped its sender and then hands its output senders back.
#[must_use]
pub fn spawn_response_time_aggregator(
    mut samples_rx: mpsc::Receiver<u64>,
    outputs: ResponseTimeOutputs,
) -> JoinHandle<ResponseTimeOutputs> {
    tokio::spawn(async move {
        let mut state = ResponseTimeAggregator::new();
        let mut samples_out = Output::new(outputs.samples_tx, "response times");
        let mut stats_out = Output::new(outputs.stats_tx, "response time stats");

        while let Some(sample_ms) = samples_rx.recv().await {
            samples_out.emit(sample_ms).await;
            if let Some(stats) = state.observe(sample_ms) {
                stats_out.emit(stats).await;
            }
        }

        ResponseTimeOutputs {
            samples_tx: samples_out.into_sender(),
            stats_tx: stats_out.into_sender(),
        }
    })
}
