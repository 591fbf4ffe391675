use axum::response::IntoResponse;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;

/// Install the global Prometheus recorder and describe the site's metrics.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        "backend_requests_total",
        "Backend API calls by operation and outcome"
    );
    metrics::describe_histogram!(
        "backend_request_seconds",
        "Backend API call latency by operation"
    );
    metrics::describe_counter!(
        "reservation_submissions_total",
        "Reservation form submissions by outcome"
    );

    Ok(handle)
}

/// Prometheus metrics scrape endpoint.
/// Returns metrics in Prometheus text exposition format.
pub async fn prometheus_metrics(
    axum::extract::State(handle): axum::extract::State<Arc<PrometheusHandle>>,
) -> impl IntoResponse {
    handle.render()
}
