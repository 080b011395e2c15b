use crate::model::Classifier;
use crate::server::{handlers, types::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

pub fn create_router(classifier: Arc<dyn Classifier>, metrics: PrometheusHandle) -> Router {
    let state = Arc::new(AppState {
        classifier,
        metrics,
    });

    Router::new()
        .route("/", get(handlers::read_root))
        .route("/predict/", post(handlers::predict_digit))
        .route("/predict", post(handlers::predict_digit))
        .route("/metrics", get(handlers::render_metrics))
        .with_state(state)
}
