//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, status, upstream
//! - `relay_request_duration_seconds` (histogram): latency distribution
//! - `relay_asset_cache_hits_total` / `relay_asset_cache_misses_total`
//! - `relay_asset_cache_entries` (gauge): current cache population

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "failed to install metrics exporter"),
    }
}

/// Record one completed relay request.
pub fn record_request(method: &str, status: u16, upstream: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("upstream", upstream.to_string()),
    ];
    metrics::counter!("relay_requests_total", &labels).increment(1);
    metrics::histogram!("relay_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_hit() {
    metrics::counter!("relay_asset_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    metrics::counter!("relay_asset_cache_misses_total").increment(1);
}

pub fn record_cache_size(entries: usize) {
    metrics::gauge!("relay_asset_cache_entries").set(entries as f64);
}
