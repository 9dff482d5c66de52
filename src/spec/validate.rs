use bytes::Bytes;
use tracing::{info, warn};

use super::types::{HttpVerb, RawRequest, RequestTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    UnsupportedVerb,
    UnserializableBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub verb: String,
    pub url: String,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub rejected: Vec<Rejection>,
}

/// Filters the raw request pool down to templates a worker can send.
///
/// Requests with a verb outside GET/POST/PUT/DELETE, or whose body cannot be
/// encoded as JSON, are dropped and logged. Surviving templates keep their
/// original order.
#[must_use]
pub fn validate_requests(raw: Vec<RawRequest>) -> (Vec<RequestTemplate>, ValidationReport) {
    let total = raw.len();
    let mut templates = Vec::with_capacity(total);
    let mut rejected = Vec::new();

    for (index, request) in raw.into_iter().enumerate() {
        let verb = match request.verb.parse::<HttpVerb>() {
            Ok(verb) => verb,
            Err(err) => {
                warn!("Rejected request #{} ({}): {}", index, request.url, err);
                rejected.push(Rejection {
                    index,
                    verb: request.verb,
                    url: request.url,
                    reason: RejectionReason::UnsupportedVerb,
                });
                continue;
            }
        };

        let body = match encode_body(request.body.as_ref()) {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "Rejected request #{}: could not encode body for verb: {} url: {}: {}",
                    index, verb, request.url, err
                );
                rejected.push(Rejection {
                    index,
                    verb: request.verb,
                    url: request.url,
                    reason: RejectionReason::UnserializableBody,
                });
                continue;
            }
        };

        templates.push(RequestTemplate {
            verb,
            url: request.url,
            headers: request.headers,
            body,
        });
    }

    let report = ValidationReport {
        total,
        valid: templates.len(),
        rejected,
    };
    info!(
        "Total requests: {} valid requests: {}",
        report.total, report.valid
    );
    (templates, report)
}

fn encode_body(body: Option<&serde_json::Value>) -> Result<Option<Bytes>, serde_json::Error> {
    match body {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => serde_json::to_vec(value).map(|bytes| Some(Bytes::from(bytes))),
    }
}
