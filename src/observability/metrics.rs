//! Metrics collection and exposition.
//!
//! # Metrics
//! - `player_refresh_total` (counter): refresh attempts by outcome
//! - `player_refresh_duration_seconds` (histogram): search round trip plus filtering
//! - `player_cache_records` (gauge): records in the current snapshot
//! - `player_records_dropped_total` (counter): matched blobs with incomplete metadata
//! - `player_meta_requests_total` (counter): `/api/meta` reads

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_refresh(outcome: &'static str, started: Instant) {
    ::metrics::counter!("player_refresh_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("player_refresh_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_cache_records(kept: usize, dropped: usize) {
    ::metrics::gauge!("player_cache_records").set(kept as f64);
    ::metrics::counter!("player_records_dropped_total").increment(dropped as u64);
}

pub fn record_meta_request(records: usize) {
    ::metrics::counter!("player_meta_requests_total").increment(1);
    tracing::trace!(records, "Served audio metadata");
}
