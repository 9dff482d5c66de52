/// Requests started and responses completed during one tick interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RpsSnapshot {
    pub requests: u64,
    pub responses: u64,
}

/// Running response-time aggregates over the whole run, in milliseconds.
///
/// Once at least one sample has been observed, `min_ms <= average_ms <= max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTimeStats {
    pub average_ms: u64,
    pub max_ms: u64,
    pub min_ms: u64,
}
