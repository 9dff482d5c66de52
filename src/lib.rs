//! Core library for the `blitz` load generator.
//!
//! A run replays a validated pool of request templates from N concurrent
//! clients for a bounded duration. Workers feed per-request events into
//! aggregators that publish requests/responses per second, running latency
//! stats, raw latency samples and classified errors on bounded queues. The
//! run orchestrator owns the lifecycle (`Idle -> Running -> Draining ->
//! Done`) and closes every queue in a fixed order once the deadline passes
//! or the run is cancelled.
pub mod app;
pub mod args;
pub mod config;
mod entry;
pub mod error;
pub mod http;
pub mod metrics;
pub mod runner;
pub mod shutdown;
pub mod spec;
mod system;

pub use entry::run;
