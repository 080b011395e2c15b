use axum::{extract::State, Json};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::error::InferenceError;
use crate::observability::{INFERENCE_SECONDS, PREDICTIONS_TOTAL, REJECTED_REQUESTS_TOTAL};
use crate::preprocessing::ImageSample;
use crate::server::types::*;

pub async fn read_root() -> Json<HelloResponse> {
    Json(HelloResponse::default())
}

pub async fn predict_digit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, InferenceError> {
    // 1. Validate
    let sample = ImageSample::new(payload.image_data).inspect_err(|e| {
        let reason = match e {
            InferenceError::ShapeMismatch { .. } => "shape",
            _ => "range",
        };
        counter!(REJECTED_REQUESTS_TOTAL, "reason" => reason).increment(1);
        warn!(error = %e, "rejected sample");
    })?;

    // 2. Inference, off the async workers
    let start = Instant::now();
    let classifier = Arc::clone(&state.classifier);
    let digit = tokio::task::spawn_blocking(move || classifier.predict(&sample))
        .await?
        .inspect_err(|e| error!(error = %e, "inference failed"))?;
    let duration = start.elapsed();

    histogram!(INFERENCE_SECONDS).record(duration.as_secs_f64());
    counter!(PREDICTIONS_TOTAL, "digit" => digit.to_string()).increment(1);
    debug!(
        digit,
        inference_time_ms = duration.as_secs_f64() * 1000.0,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        predictions: digit,
    }))
}

pub async fn render_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
