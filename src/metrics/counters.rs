use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use super::RpsSnapshot;
use super::output::Output;

/// Pulse queues fed by the client workers.
pub struct CounterInputs {
    pub requests_rx: mpsc::Receiver<()>,
    pub responses_rx: mpsc::Receiver<()>,
}

/// Tasks of the counters aggregator.
///
/// The counting tasks resolve to the total number of pulses they observed;
/// the emitter resolves to its output sender once it has flushed the last
/// partial interval.
pub struct CountersHandle {
    pub request_counter: JoinHandle<u64>,
    pub response_counter: JoinHandle<u64>,
    pub emitter: JoinHandle<mpsc::Sender<RpsSnapshot>>,
}

/// Spawns the request counter, the response counter, and the RPS emitter.
///
/// Both counters drain their pulse queue until every worker has dropped its
/// sender. The emitter swaps both counters to zero on every `tick` and
/// sends the pre-reset values as one pair; after both counters exit it
/// flushes whatever was counted since the last tick, so the emitted pairs
/// always sum to the exact number of pulses.
#[must_use]
pub fn spawn_counters(
    inputs: CounterInputs,
    rps_tx: mpsc::Sender<RpsSnapshot>,
    tick: Duration,
) -> CountersHandle {
    let requests = Arc::new(AtomicU64::new(0));
    let responses = Arc::new(AtomicU64::new(0));
    // Counters hold the senders; the emitter sees `None` once both exit.
    let (alive_tx, alive_rx) = mpsc::channel::<()>(1);

    let request_counter =
        spawn_pulse_counter(inputs.requests_rx, requests.clone(), alive_tx.clone());
    let response_counter = spawn_pulse_counter(inputs.responses_rx, responses.clone(), alive_tx);
    let emitter = spawn_rps_emitter(requests, responses, alive_rx, rps_tx, tick);

    CountersHandle {
        request_counter,
        response_counter,
        emitter,
    }
}

fn spawn_pulse_counter(
    mut pulses_rx: mpsc::Receiver<()>,
    counter: Arc<AtomicU64>,
    alive_tx: mpsc::Sender<()>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut total: u64 = 0;
        while pulses_rx.recv().await.is_some() {
            counter.fetch_add(1, Ordering::AcqRel);
            total = total.saturating_add(1);
        }
        drop(alive_tx);
        total
    })
}

fn spawn_rps_emitter(
    requests: Arc<AtomicU64>,
    responses: Arc<AtomicU64>,
    mut alive_rx: mpsc::Receiver<()>,
    rps_tx: mpsc::Sender<RpsSnapshot>,
    tick: Duration,
) -> JoinHandle<mpsc::Sender<RpsSnapshot>> {
    tokio::spawn(async move {
        let mut output = Output::new(rps_tx, "rps");
        let first_tick = Instant::now().checked_add(tick).unwrap_or_else(Instant::now);
        let mut ticker = interval_at(first_tick, tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = swap_snapshot(&requests, &responses);
                    output.emit(snapshot).await;
                }
                _ = alive_rx.recv() => {
                    let residual = swap_snapshot(&requests, &responses);
                    if residual != RpsSnapshot::default() {
                        debug!(
                            "Flushing partial interval: {} requests, {} responses",
                            residual.requests, residual.responses
                        );
                        output.emit(residual).await;
                    }
                    break;
                }
            }
        }

        output.into_sender()
    })
}

fn swap_snapshot(requests: &AtomicU64, responses: &AtomicU64) -> RpsSnapshot {
    RpsSnapshot {
        requests: requests.swap(0, Ordering::AcqRel),
        responses: responses.swap(0, Ordering::AcqRel),
    }
}
