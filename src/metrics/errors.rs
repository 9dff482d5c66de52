use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::spec::HttpVerb;

use super::output::Output;

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Connect,
    Timeout,
    Request,
    Body,
    Other,
}

impl NetworkErrorKind {
    #[must_use]
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() {
            NetworkErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            NetworkErrorKind::Body
        } else if err.is_request() || err.is_builder() {
            NetworkErrorKind::Request
        } else {
            NetworkErrorKind::Other
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NetworkErrorKind::Connect => "connect",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Request => "request",
            NetworkErrorKind::Body => "body",
            NetworkErrorKind::Other => "other",
        }
    }
}

/// The call could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkError {
    pub timestamp_nanos: i64,
    pub kind: NetworkErrorKind,
    pub message: String,
}

impl NetworkError {
    #[must_use]
    pub fn from_reqwest(timestamp_nanos: i64, err: &reqwest::Error) -> Self {
        Self {
            timestamp_nanos,
            kind: NetworkErrorKind::classify(err),
            message: err.to_string(),
        }
    }
}

/// The call completed with a status outside `[200, 300)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    pub timestamp_nanos: i64,
    pub verb: HttpVerb,
    pub url: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorEvent {
    Network(NetworkError),
    Response(ResponseError),
}

impl ErrorEvent {
    #[must_use]
    pub const fn timestamp_nanos(&self) -> i64 {
        match self {
            ErrorEvent::Network(err) => err.timestamp_nanos,
            ErrorEvent::Response(err) => err.timestamp_nanos,
        }
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorEvent::Network(err) => write!(f, "[{}] {}", err.kind.as_str(), err.message),
            ErrorEvent::Response(err) => {
                write!(f, "{} {} {}", err.status_code, err.verb, err.url)
            }
        }
    }
}

/// Outbound queues of the error aggregator.
pub struct ErrorOutputs {
    /// Running error count after each event.
    pub count_tx: mpsc::Sender<u64>,
    /// Each event, forwarded unchanged.
    pub details_tx: mpsc::Sender<ErrorEvent>,
}

/// Spawns the error aggregator. For every event the updated count is sent
/// before the event itself, so the count never trails the details.
#[must_use]
pub fn spawn_error_aggregator(
    mut errors_rx: mpsc::Receiver<ErrorEvent>,
    outputs: ErrorOutputs,
) -> JoinHandle<ErrorOutputs> {
    tokio::spawn(async move {
        let mut error_count: u64 = 0;
        let mut count_out = Output::new(outputs.count_tx, "error count");
        let mut details_out = Output::new(outputs.details_tx, "error details");

        while let Some(event) = errors_rx.recv().await {
            error_count = error_count.saturating_add(1);
            count_out.emit(error_count).await;
            details_out.emit(event).await;
        }

        ErrorOutputs {
            count_tx: count_out.into_sender(),
            details_tx: details_out.into_sender(),
        }
    })
}
