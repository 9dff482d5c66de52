//! Aggregators that turn raw per-request events into live statistics.
mod counters;
mod errors;
mod histogram;
mod output;
mod response_time;
mod types;


pub use counters::{CounterInputs, CountersHandle, spawn_counters};
pub use errors::{
    ErrorEvent, ErrorOutputs, NetworkError, NetworkErrorKind, ResponseError,
    spawn_error_aggregator,
};
pub use histogram::LatencyHistogram;
pub use response_time::{
    ResponseTimeAggregator, ResponseTimeOutputs, spawn_response_time_aggregator,
};
pub use types::{ResponseTimeStats, RpsSnapshot};

/// Interval at which request/response counters are swapped and emitted.
pub const RPS_TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);
