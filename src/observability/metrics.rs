//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_cache_lookups_total` (counter): hit / miss / bypass / error
//! - `gateway_cache_writes_total` (counter): stored / failed / dropped
//! - `gateway_cache_purges_total` (counter): removed / absent / error
//! - `gateway_failures_total` (counter): error-boundary catches by kind
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(outcome: &'static str) {
    counter!("gateway_cache_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_write(outcome: &'static str) {
    counter!("gateway_cache_writes_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_purge(outcome: &'static str) {
    counter!("gateway_cache_purges_total", "outcome" => outcome).increment(1);
}

pub fn record_failure(kind: &'static str) {
    counter!("gateway_failures_total", "kind" => kind).increment(1);
}
