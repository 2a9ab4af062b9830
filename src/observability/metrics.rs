//! Metrics collection and exposition.
//!
//! # Metrics
//! - `blood_sugar_requests_total` (counter): requests by method, status
//! - `blood_sugar_request_duration_seconds` (histogram): latency by method
//! - `blood_sugar_readings_created_total` (counter)
//! - `blood_sugar_readings_deleted_total` (counter)
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "blood_sugar_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("blood_sugar_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_reading_created() {
    metrics::counter!("blood_sugar_readings_created_total").increment(1);
}

pub fn record_reading_deleted() {
    metrics::counter!("blood_sugar_readings_deleted_total").increment(1);
}

/// Middleware recording method, status and latency of every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let start = Instant::now();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
