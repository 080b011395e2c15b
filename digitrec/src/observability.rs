//! Logging and metrics setup shared by the server and client binaries.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const PREDICTIONS_TOTAL: &str = "digitrec_predictions_total";
pub const REJECTED_REQUESTS_TOTAL: &str = "digitrec_rejected_requests_total";
pub const INFERENCE_SECONDS: &str = "digitrec_inference_seconds";

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
///
/// Returns false when a global subscriber was already set.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Installs the global Prometheus recorder and returns the handle `/metrics` renders from.
pub fn install_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
