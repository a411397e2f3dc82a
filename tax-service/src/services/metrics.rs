//! Prometheus metrics for tax-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

/// Recorder for the `metrics` facade used by the HTTP middleware.
static HTTP_METRICS_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Tax calculations by pricing mode.
pub static TAX_CALCULATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "tax_calculations_total",
        "Total number of tax calculations by pricing mode",
        &["mode"] // unconfigured, exempt, inclusive, exclusive
    )
    .expect("Failed to register tax_calculations_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "tax_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register tax_errors_total")
});

/// Store query duration histogram.
pub static STORE_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "tax_store_query_duration_seconds",
        "Store query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register tax_store_query_duration_seconds")
});

/// Initialize all metrics (forces lazy initialization). Safe to call more than once.
pub fn init_metrics() {
    HTTP_METRICS_HANDLE.get_or_init(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed");
            None
        }
    });
    Lazy::force(&TAX_CALCULATIONS_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&STORE_QUERY_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = HTTP_METRICS_HANDLE
        .get()
        .and_then(|handle| handle.as_ref())
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    output.push_str(
        &encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default(),
    );
    output
}
