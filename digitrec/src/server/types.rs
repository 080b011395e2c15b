use crate::model::Classifier;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared Application State
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub metrics: PrometheusHandle,
}

// --- DTOs (Data Transfer Objects) ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictRequest {
    /// Flattened 28x28 grayscale pixels, row-major.
    pub image_data: Vec<f32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictResponse {
    pub predictions: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HelloResponse {
    #[serde(rename = "Hello")]
    pub hello: String,
}

impl Default for HelloResponse {
    fn default() -> Self {
        Self {
            hello: "world".to_string(),
        }
    }
}
