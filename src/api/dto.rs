//! REST API request/response data transfer objects

use serde::Serialize;

use crate::storage::PredictionRecord;

/// Liveness probe response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Predict response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub filename: String,
    pub prediction: String,
    /// Percentage string with exactly two decimals, e.g. "97.34%".
    pub confidence: String,
    /// Whether the audit record reached the store.
    pub stored: bool,
}

/// Records listing response
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<PredictionRecord>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}
