//! Prediction service - core request orchestration
//!
//! Binds upload -> inference -> persistence -> response. The pipeline is a
//! single linear sequence per request: no retries, no rollback.

use std::sync::Arc;

use tracing::{info, warn};

use crate::engine::Classifier;
use crate::error::ServiceError;
use crate::storage::{PredictionRecord, RecordStorage};

use super::types::ClassifyOutcome;

/// Request orchestrator over an injected classifier and record store.
pub struct PredictService<C: Classifier, S: RecordStorage> {
    classifier: Arc<C>,
    storage: Arc<S>,
}

impl<C: Classifier, S: RecordStorage> PredictService<C, S> {
    pub fn new(classifier: Arc<C>, storage: Arc<S>) -> Self {
        Self {
            classifier,
            storage,
        }
    }

    /// Classify an uploaded image and append the audit record.
    ///
    /// Inference runs on a blocking worker thread; decode failures surface
    /// before the model is invoked. The persistence write is attempted
    /// exactly once: on failure the outcome still carries the prediction,
    /// with `stored` set to false.
    pub async fn handle_upload(
        &self,
        filename: &str,
        image_data: &[u8],
    ) -> Result<ClassifyOutcome, ServiceError> {
        let classifier = self.classifier.clone();
        let data = image_data.to_vec();

        let prediction = tokio::task::spawn_blocking(move || classifier.classify(&data))
            .await
            .map_err(|e| ServiceError::Inference(e.to_string()))??;

        info!(
            "Classified {} as {} ({:.4})",
            filename, prediction.label, prediction.confidence
        );

        let record = PredictionRecord::new(filename, image_data, &prediction);
        let stored = match self.storage.append(&record).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist record for {}: {}", filename, e);
                false
            }
        };

        Ok(ClassifyOutcome {
            filename: filename.to_string(),
            prediction,
            stored,
        })
    }

    /// Return every stored record.
    pub async fn records(&self) -> Result<Vec<PredictionRecord>, ServiceError> {
        self.storage.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::engine::Prediction;

    /// Classifier double returning a fixed prediction.
    struct FixedClassifier {
        label: &'static str,
        confidence: f32,
    }

    impl Classifier for FixedClassifier {
        fn classify(&self, image_data: &[u8]) -> Result<Prediction, ServiceError> {
            // Mirror the real adapter: decode failures short-circuit.
            crate::engine::preprocess::decode_image(image_data)?;
            Ok(Prediction {
                label: self.label.to_string(),
                confidence: self.confidence,
            })
        }
    }

    /// In-memory record store for orchestration tests.
    #[derive(Default)]
    struct MemoryStorage {
        records: Mutex<Vec<PredictionRecord>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl RecordStorage for MemoryStorage {
        async fn append(&self, record: &PredictionRecord) -> Result<(), ServiceError> {
            if self.fail_writes {
                return Err(persistence_error());
            }
            self.records.lock().await.push(record.clone());
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<PredictionRecord>, ServiceError> {
            Ok(self.records.lock().await.clone())
        }
    }

    fn persistence_error() -> ServiceError {
        // Build a real driver error so the taxonomy stays honest.
        ServiceError::Persistence(mongodb::error::Error::custom("connection lost"))
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::ImageBuffer::from_pixel(
            1,
            1,
            image::Rgb([200u8, 10, 10]),
        ));
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[tokio::test]
    async fn test_upload_appends_matching_record() {
        let service = PredictService::new(
            Arc::new(FixedClassifier {
                label: "Kırık",
                confidence: 0.9734,
            }),
            Arc::new(MemoryStorage::default()),
        );

        let outcome = service
            .handle_upload("cracked.png", &tiny_png())
            .await
            .unwrap();

        assert_eq!(outcome.filename, "cracked.png");
        assert_eq!(outcome.prediction.label, "Kırık");
        assert!(outcome.stored);

        let records = service.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "cracked.png");
        assert_eq!(records[0].prediction, "Kırık");
        assert_eq!(records[0].confidence, 97.34);
    }

    #[tokio::test]
    async fn test_decode_failure_never_reaches_storage() {
        let service = PredictService::new(
            Arc::new(FixedClassifier {
                label: "Sağlam",
                confidence: 0.6,
            }),
            Arc::new(MemoryStorage::default()),
        );

        let result = service.handle_upload("notes.jpg", b"plain text, not an image").await;
        assert!(matches!(result, Err(ServiceError::Decode(_))));
        assert!(service.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_still_returns_prediction() {
        let service = PredictService::new(
            Arc::new(FixedClassifier {
                label: "Sağlam",
                confidence: 0.88,
            }),
            Arc::new(MemoryStorage {
                fail_writes: true,
                ..Default::default()
            }),
        );

        let outcome = service.handle_upload("ok.png", &tiny_png()).await.unwrap();
        assert_eq!(outcome.prediction.label, "Sağlam");
        assert!(!outcome.stored);
    }

    #[tokio::test]
    async fn test_repeat_uploads_accumulate_records() {
        let service = PredictService::new(
            Arc::new(FixedClassifier {
                label: "Kırık",
                confidence: 0.7,
            }),
            Arc::new(MemoryStorage::default()),
        );

        let png = tiny_png();
        service.handle_upload("a.png", &png).await.unwrap();
        service.handle_upload("a.png", &png).await.unwrap();

        // No dedup: identical uploads each get their own record.
        assert_eq!(service.records().await.unwrap().len(), 2);
    }
}
