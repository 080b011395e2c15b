use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::client::error::ClientError;
use crate::server::types::PredictRequest;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the prediction service.
pub struct PredictClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    /// `base_url` should look like `http://localhost:8000`; a trailing slash is dropped.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict/", self.base_url)
    }

    /// Sends a flattened sample and returns the predicted digit.
    pub async fn predict(&self, image_data: Vec<f32>) -> Result<u8, ClientError> {
        let url = self.predict_url();
        info!(url = %url, pixels = image_data.len(), "requesting prediction");

        let resp = self
            .client
            .post(&url)
            .json(&PredictRequest { image_data })
            .send()
            .await
            .map_err(|e| ClientError::from_transport(&url, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::from_transport(&url, e))?;
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|_| ClientError::non_json(&body))?;
        let digit = parse_prediction(&value)?;
        debug!(digit, "prediction received");
        Ok(digit)
    }
}

/// Pulls an integer label in 0..=9 out of `{"predictions": N}`.
pub fn parse_prediction(value: &Value) -> Result<u8, ClientError> {
    value
        .get("predictions")
        .and_then(Value::as_u64)
        .filter(|digit| *digit <= 9)
        .map(|digit| digit as u8)
        .ok_or(ClientError::UnexpectedFormat)
}
