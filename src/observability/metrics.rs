//! Metrics collection.
//!
//! # Metrics
//! - `authretry_resolutions_total` (counter): challenge outcomes by `outcome`
//! - `authretry_requests_total` (counter): attempts sent, by method and status
//! - `authretry_request_duration_seconds` (histogram): per-attempt latency
//!
//! Recorded through the `metrics` facade; without an installed recorder they
//! are no-ops.

use std::time::Instant;

/// Record the outcome of one coordinator decision.
pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("authretry_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record one attempt that reached the server.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("authretry_requests_total", &labels).increment(1);
    metrics::histogram!("authretry_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
