//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "codemaster_requests_total",
        "Total number of generate requests processed"
    );
    metrics::describe_histogram!(
        "codemaster_request_duration_seconds",
        "Generate request duration in seconds"
    );
    metrics::describe_counter!(
        "codemaster_provider_errors_total",
        "Generate requests answered with an in-band provider error"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a generate request
///
/// `status` is "success", "error" (in-band provider error) or "invalid"
/// (rejected request body).
pub fn record_request(status: &str, duration_secs: f64) {
    metrics::counter!("codemaster_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("codemaster_request_duration_seconds").record(duration_secs);
}

/// Record a provider failure
pub fn record_provider_error(provider: &str) {
    metrics::counter!("codemaster_provider_errors_total", "provider" => provider.to_string())
        .increment(1);
}
