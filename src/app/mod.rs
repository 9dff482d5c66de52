//! Headless consumer of a run's output queues.
mod consume;
mod summary;


pub use consume::{ERROR_LOG_CAPACITY, consume};
pub use summary::{RunSummary, summary_lines};
