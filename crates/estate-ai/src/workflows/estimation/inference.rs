use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Request payload for the prediction endpoint. Feature order is fixed:
/// land size, frontage, breadth, coverage ratio, floor area ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub city_code: String,
    pub features: [f64; 5],
}

/// Failure modes of a remote prediction, kept apart so callers can decide
/// between retry and fallback per cause.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference endpoint returned HTTP {0}")]
    Status(u16),
    #[error("inference response was unusable: {0}")]
    MalformedBody(String),
    #[error("inference response did not carry a numeric 'predicted_price'")]
    MissingPrediction,
    #[error("inference request timed out")]
    Timeout,
    #[error("inference transport failed: {0}")]
    Transport(String),
}

/// Seam to the external price prediction service.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Requests a predicted price. The request is idempotent (same input,
    /// same output) and therefore safely retryable, but implementations
    /// perform exactly one attempt; retry policy belongs to the caller.
    async fn predict(&self, request: &PredictionRequest) -> Result<f64, InferenceError>;
}

/// reqwest-backed client for the prediction service's `POST /predict`.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInferenceClient {
    /// `timeout` bounds the whole request. The caller supplies it, together
    /// with any retry policy; the client performs exactly one attempt.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl InferenceGateway for HttpInferenceClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<f64, InferenceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await.map_err(|err| {
            if err.is_timeout() {
                InferenceError::Timeout
            } else {
                InferenceError::MalformedBody(err.to_string())
            }
        })?;

        let predicted = body
            .get("predicted_price")
            .and_then(serde_json::Value::as_f64)
            .ok_or(InferenceError::MissingPrediction)?;

        // Zero is a legitimate prediction; only a negative or non-finite
        // value marks the response as unusable.
        if !predicted.is_finite() || predicted < 0.0 {
            return Err(InferenceError::MalformedBody(format!(
                "predicted_price {predicted} is not a valid price"
            )));
        }

        Ok(predicted)
    }
}

fn map_transport_error(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Timeout
    } else {
        InferenceError::Transport(err.to_string())
    }
}
