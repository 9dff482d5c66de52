use std::time::Duration;

use chrono::{DateTime, Local};

use crate::metrics::{ErrorEvent, ResponseTimeStats};

const MS_PER_SEC: u128 = 1_000;
/// Two decimal places for rates.
const RATE_SCALE: u128 = 100;
const PLACEHOLDER: &str = "-";

/// Everything the consumer learned from one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub elapsed: Duration,
    pub ticks: u64,
    pub total_requests: u64,
    pub total_responses: u64,
    pub samples: u64,
    pub error_count: u64,
    /// `None` when no response completed.
    pub latest_stats: Option<ResponseTimeStats>,
    pub percentiles: (u64, u64, u64),
    /// Oldest first.
    pub recent_errors: Vec<ErrorEvent>,
}

impl RunSummary {
    pub(crate) const fn empty() -> Self {
        Self {
            elapsed: Duration::ZERO,
            ticks: 0,
            total_requests: 0,
            total_responses: 0,
            samples: 0,
            error_count: 0,
            latest_stats: None,
            percentiles: (0, 0, 0),
            recent_errors: Vec::new(),
        }
    }

    /// Requests per second over the whole run, scaled by 100.
    #[must_use]
    pub fn avg_rps_x100(&self) -> u64 {
        let elapsed_ms = self.elapsed.as_millis().max(1);
        let scaled = u128::from(self.total_requests)
            .saturating_mul(MS_PER_SEC)
            .saturating_mul(RATE_SCALE)
            .checked_div(elapsed_ms)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// Renders the final summary, one line per entry.
#[must_use]
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let avg_rps_x100 = u128::from(summary.avg_rps_x100());

    lines.push(format!("Duration: {:.3}s", summary.elapsed.as_secs_f64()));
    lines.push(format!("Total Requests: {}", summary.total_requests));
    lines.push(format!("Total Responses: {}", summary.total_responses));
    lines.push(format!(
        "Avg RPS: {}.{:02}",
        avg_rps_x100.checked_div(RATE_SCALE).unwrap_or(0),
        avg_rps_x100.checked_rem(RATE_SCALE).unwrap_or(0)
    ));
    lines.push(format!("Errors: {}", summary.error_count));

    match summary.latest_stats {
        Some(stats) => {
            lines.push(format!("Avg Latency: {}ms", stats.average_ms));
            lines.push(format!(
                "Min/Max Latency: {}ms / {}ms",
                stats.min_ms, stats.max_ms
            ));
        }
        None => {
            lines.push(format!("Avg Latency: {}", PLACEHOLDER));
            lines.push(format!("Min/Max Latency: {} / {}", PLACEHOLDER, PLACEHOLDER));
        }
    }
    if summary.samples > 0 {
        let (p50, p90, p99) = summary.percentiles;
        lines.push(format!(
            "P50/P90/P99 Latency: {}ms / {}ms / {}ms",
            p50, p90, p99
        ));
    } else {
        lines.push(format!(
            "P50/P90/P99 Latency: {} / {} / {}",
            PLACEHOLDER, PLACEHOLDER, PLACEHOLDER
        ));
    }

    if !summary.recent_errors.is_empty() {
        lines.push(format!("Recent Errors ({}):", summary.recent_errors.len()));
        for event in &summary.recent_errors {
            lines.push(format!("  {} {}", format_timestamp(event.timestamp_nanos()), event));
        }
    }
    lines
}

fn format_timestamp(timestamp_nanos: i64) -> String {
    DateTime::from_timestamp_nanos(timestamp_nanos)
        .with_timezone(&Local)
        .format("%H:%M:%S%.3f")
        .to_string()
}
