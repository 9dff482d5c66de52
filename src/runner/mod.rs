//! Run orchestration: wires workers to aggregators, enforces the deadline,
//! and tears everything down in a fixed order.
mod config;
mod handle;
mod start;
mod supervisor;

#[cfg(test)]
mod tests;

pub use config::{RunConfig, RunState};
pub use handle::{RunHandle, RunOutputs, RunReport};
pub use start::Runner;
