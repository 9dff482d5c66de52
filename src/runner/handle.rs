use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::AppResult;
use crate::http::ActiveClients;
use crate::metrics::{ErrorEvent, ResponseTimeStats, RpsSnapshot};
use crate::shutdown::CancelHandle;

use super::RunState;

/// Receiving ends of every output queue. Each closes once the run is done
/// and its buffered values have been read.
pub struct RunOutputs {
    pub rps: mpsc::Receiver<RpsSnapshot>,
    pub response_times: mpsc::Receiver<u64>,
    pub response_stats: mpsc::Receiver<ResponseTimeStats>,
    pub errors: mpsc::Receiver<ErrorEvent>,
    pub error_count: mpsc::Receiver<u64>,
}

/// Final account of a run, produced by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunState,
    pub elapsed: Duration,
    /// The run ended through `cancel()` rather than the deadline.
    pub cancelled_early: bool,
    pub requests: u64,
    pub responses: u64,
    pub task_failures: Vec<String>,
}

/// Handle to a started run.
pub struct RunHandle {
    pub(super) outputs: Option<RunOutputs>,
    pub(super) cancel: CancelHandle,
    pub(super) state_rx: watch::Receiver<RunState>,
    pub(super) active: ActiveClients,
    pub(super) supervisor: JoinHandle<RunReport>,
}

impl RunHandle {
    /// Moves the output receivers out. Returns `None` on the second call.
    pub fn take_outputs(&mut self) -> Option<RunOutputs> {
        self.outputs.take()
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Ends the run early. Safe to call any number of times, from any task.
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        *self.state_rx.borrow()
    }

    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state_rx.clone()
    }

    /// Number of workers that have not exited yet.
    #[must_use]
    pub fn active_clients(&self) -> usize {
        self.active.get()
    }

    /// Resolves once every task has exited and every output queue is closed.
    pub fn done(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut state_rx = self.state_rx.clone();
        async move {
            drop(state_rx.wait_for(|state| *state == RunState::Done).await);
        }
    }

    /// Waits for the supervisor and returns its report.
    ///
    /// # Errors
    ///
    /// Returns an error if the supervisor task itself panicked.
    pub async fn wait(self) -> AppResult<RunReport> {
        Ok(self.supervisor.await?)
    }
}
