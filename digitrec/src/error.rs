use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model not found at path: {0}")]
    ModelNotFound(String),

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("Input shape mismatch: expected {expected} pixels, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Pixel {index} has value {value} outside [0, 255]")]
    PixelOutOfRange { index: usize, value: f32 },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unexpected model output: {0}")]
    UnexpectedOutput(String),

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),

    #[error("Inference session is poisoned")]
    SessionPoisoned,

    #[error("Inference task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

impl InferenceError {
    /// True for errors caused by the request payload rather than the service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            InferenceError::ShapeMismatch { .. } | InferenceError::PixelOutOfRange { .. }
        )
    }
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        // Inference failures stay opaque to callers.
        let (status, error_message) = if self.is_invalid_input() {
            (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found_error() {
        let error = InferenceError::ModelNotFound("models/mnist-8.onnx".to_string());
        assert_eq!(
            error.to_string(),
            "Model not found at path: models/mnist-8.onnx"
        );
    }

    #[test]
    fn test_shape_mismatch_error() {
        let error = InferenceError::ShapeMismatch {
            expected: 784,
            got: 1568,
        };
        assert_eq!(
            error.to_string(),
            "Input shape mismatch: expected 784 pixels, got 1568"
        );
        assert!(error.is_invalid_input());
    }

    #[test]
    fn test_pixel_out_of_range_error() {
        let error = InferenceError::PixelOutOfRange {
            index: 3,
            value: 300.0,
        };
        assert_eq!(error.to_string(), "Pixel 3 has value 300 outside [0, 255]");
        assert!(error.is_invalid_input());
    }

    #[test]
    fn test_invalid_model_error() {
        let error = InferenceError::InvalidModel("model declares no inputs".to_string());
        assert_eq!(error.to_string(), "Invalid model: model declares no inputs");
        assert!(!error.is_invalid_input());
    }

    #[test]
    fn test_shape_error_conversion() {
        let shape_error = ShapeError::from_kind(ndarray::ErrorKind::OutOfBounds);
        let inference_error = InferenceError::from(shape_error);
        assert!(matches!(inference_error, InferenceError::ShapeError(_)));
        assert!(!inference_error.is_invalid_input());
    }

    #[test]
    fn test_ort_error_conversion() {
        let ort_error = ort::Error::new("test error");
        let inference_error = InferenceError::from(ort_error);
        assert!(matches!(inference_error, InferenceError::OrtError(_)));
    }

    #[test]
    fn test_into_response_shape_mismatch() {
        let error = InferenceError::ShapeMismatch {
            expected: 784,
            got: 10,
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_into_response_inference_failure_is_opaque() {
        let error = InferenceError::UnexpectedOutput("expected 10 scores, got 3".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_into_response_body_is_structured() {
        let error = InferenceError::PixelOutOfRange {
            index: 0,
            value: -1.0,
        };
        let response = error.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Pixel 0 has value -1 outside [0, 255]");
    }
}
