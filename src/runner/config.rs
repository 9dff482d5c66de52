use std::path::PathBuf;
use std::time::Duration;

use crate::args::PositiveUsize;
use crate::metrics::RPS_TICK_INTERVAL;

/// Settings of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub request_spec_path: PathBuf,
    pub duration: Duration,
    pub num_clients: PositiveUsize,
    /// Accepted for compatibility; the engine does not use it.
    pub metrics_endpoint: Option<String>,
    pub tick_interval: Duration,
}

impl RunConfig {
    #[must_use]
    pub const fn new(request_spec_path: PathBuf, duration: Duration, num_clients: PositiveUsize) -> Self {
        Self {
            request_spec_path,
            duration,
            num_clients,
            metrics_endpoint: None,
            tick_interval: RPS_TICK_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    #[must_use]
    pub fn with_metrics_endpoint(mut self, metrics_endpoint: Option<String>) -> Self {
        self.metrics_endpoint = metrics_endpoint;
        self
    }
}

/// Lifecycle of a run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Idle,
    Running,
    Draining,
    Done,
}

impl RunState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Draining => "draining",
            RunState::Done => "done",
        }
    }
}
