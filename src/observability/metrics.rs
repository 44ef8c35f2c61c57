//! Metrics collection and exposition.
//!
//! # Metrics
//! - `attest_canonicalize_total` (counter): canonicalizations by mode, outcome
//! - `attest_submissions_total` (counter): submit actions by outcome
//! - `attest_submission_duration_seconds` (histogram): submit latency, signer prompt included
//! - `attest_submissions_in_flight` (gauge): submissions currently pending, across controllers

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

use crate::canonical::InputMode;

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_canonicalize(mode: InputMode, ok: bool) {
    counter!(
        "attest_canonicalize_total",
        "mode" => mode.to_string(),
        "outcome" => if ok { "ok" } else { "rejected" }
    )
    .increment(1);
}

/// Record a finished submit action. `outcome` is a stable error kind or `"success"`.
pub fn record_submission(outcome: &'static str, elapsed: Duration) {
    counter!("attest_submissions_total", "outcome" => outcome).increment(1);
    histogram!("attest_submission_duration_seconds").record(elapsed.as_secs_f64());
}

/// A submission became in flight.
pub fn submission_started() {
    gauge!("attest_submissions_in_flight").increment(1.0);
}

/// A submission settled or was abandoned.
pub fn submission_finished() {
    gauge!("attest_submissions_in_flight").decrement(1.0);
}
