//! HTTP client workers: request building, execution, and the per-client loop.
mod active;
mod client;
mod execution;
mod request;
mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use active::{ActiveClients, ActiveGuard};
pub use client::{DEFAULT_USER_AGENT, build_client};
pub use execution::{ResponseOutcome, execute, now_nanos};
pub use request::build_request;
pub use worker::{ClientWorker, WorkerChannels, WorkerStats};
