//! Storage abstraction traits
//!
//! Defines the interface for prediction record persistence, so the
//! orchestrator can run against a test double instead of a live store.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::engine::Prediction;
use crate::error::ServiceError;
use crate::utils::math::percent_rounded;

/// One persisted classification event.
///
/// Exactly these four fields are stored; the store-internal identity is never
/// exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Original filename of the upload.
    pub filename: String,
    /// Predicted class label.
    pub prediction: String,
    /// Confidence as a percentage, rounded to two decimals.
    pub confidence: f64,
    /// Base64-encoded original image bytes.
    pub image: String,
}

impl PredictionRecord {
    /// Build the audit record for a successful prediction.
    pub fn new(filename: &str, image_data: &[u8], prediction: &Prediction) -> Self {
        Self {
            filename: filename.to_string(),
            prediction: prediction.label.clone(),
            confidence: percent_rounded(prediction.confidence),
            image: BASE64.encode(image_data),
        }
    }
}

/// Prediction record storage trait.
/// Implementations must be thread-safe and async-compatible.
#[async_trait]
pub trait RecordStorage: Send + Sync + 'static {
    /// Append one record to the collection. No uniqueness constraint, no
    /// dedup, no transaction with the inference step.
    async fn append(&self, record: &PredictionRecord) -> Result<(), ServiceError>;

    /// Return every stored record, identity fields stripped, in the store's
    /// natural iteration order.
    async fn list_all(&self) -> Result<Vec<PredictionRecord>, ServiceError>;
}
