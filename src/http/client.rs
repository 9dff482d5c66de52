use reqwest::Client;

use crate::error::{AppError, AppResult, HttpError};

pub const DEFAULT_USER_AGENT: &str = concat!("blitz/", env!("CARGO_PKG_VERSION"));

/// Builds the pooled client shared by every worker of a run.
///
/// No per-request timeout is set: a hung request only delays its own worker,
/// and the run deadline bounds the test as a whole.
///
/// # Errors
///
/// Returns an error when the underlying TLS backend cannot be initialized.
pub fn build_client(num_clients: usize) -> AppResult<Client> {
    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .pool_max_idle_per_host(num_clients)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
