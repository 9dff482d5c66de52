use futures_util::StreamExt;
use reqwest::{Client, Request};

/// Result of one completed call, consumed by the issuing worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub status_code: u16,
    pub response_time_ms: u64,
    pub timestamp_nanos: i64,
}

impl ResponseOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

/// Sends the request and drains the body so the connection can be reused.
///
/// # Errors
///
/// Returns the transport error when the call or the body read fails.
pub async fn execute(client: &Client, request: Request) -> Result<u16, reqwest::Error> {
    let response = client.execute(request).await?;
    let status = response.status().as_u16();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        chunk?;
    }
    Ok(status)
}

/// Wall-clock time in nanoseconds since the Unix epoch.
#[must_use]
pub fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
