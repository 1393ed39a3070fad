//! Insulator condition classifier
//!
//! Wraps a frozen EfficientNet-B0 checkpoint compiled through OpenVINO.
//! The model is loaded once at startup; inference is a single forward pass
//! over a batch of one with no state mutation.

use std::sync::Arc;

use anyhow::{Context, Result};
use openvino::{CompiledModel, Core, ElementType, Shape, Tensor};

use crate::config::CLASS_LABELS;
use crate::error::ServiceError;
use crate::utils::math::{argmax, softmax};

use super::preprocess::{self, CLASSIFIER_INPUT_SIZE};

/// Classification result: one label from the closed set and its softmax
/// probability in [0, 1].
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Seam between the orchestrator and the inference runtime, so tests can
/// substitute a double for the compiled model.
pub trait Classifier: Send + Sync + 'static {
    /// Classify raw image bytes.
    ///
    /// Fails with [`ServiceError::Decode`] before touching the model when the
    /// bytes are not a valid raster image.
    fn classify(&self, image_data: &[u8]) -> Result<Prediction, ServiceError>;
}

/// Wrapper for OpenVINO CompiledModel that implements Send + Sync.
struct SafeCompiledModel(Arc<CompiledModel>);
unsafe impl Send for SafeCompiledModel {}
unsafe impl Sync for SafeCompiledModel {}

impl SafeCompiledModel {
    /// Create an inference request.
    /// OpenVINO CompiledModel methods are thread-safe in C++, but the Rust
    /// bindings require &mut self. We bypass this restriction safely.
    fn create_infer_request(&self) -> Result<openvino::InferRequest> {
        unsafe {
            let ptr = Arc::as_ptr(&self.0) as *mut CompiledModel;
            (*ptr).create_infer_request().map_err(|e| e.into())
        }
    }
}

/// OpenVINO-backed production classifier.
pub struct OpenVinoClassifier {
    model: SafeCompiledModel,
}

impl OpenVinoClassifier {
    /// Compile the frozen model from a fixed local path.
    ///
    /// A missing or corrupt artifact is a fatal startup error; there is no
    /// per-request reload path.
    pub fn load(model_path: &str, device: &str) -> Result<Self> {
        let mut core = Core::new().context("Failed to initialize OpenVINO runtime")?;
        let model = core
            .read_model_from_file(model_path, "")
            .with_context(|| format!("Failed to read model from {}", model_path))?;
        let compiled = core
            .compile_model(&model, device.into())
            .with_context(|| format!("Failed to compile model for device {}", device))?;

        Ok(Self {
            model: SafeCompiledModel(Arc::new(compiled)),
        })
    }

    /// Run a single forward pass and return the raw score vector.
    fn forward(&self, input_tensor: &ndarray::Array4<f32>) -> Result<Vec<f32>> {
        let (input_w, input_h) = CLASSIFIER_INPUT_SIZE;

        let mut request = self.model.create_infer_request()?;

        let input_shape = Shape::new(&[1, 3, input_h as i64, input_w as i64])?;
        let mut input = Tensor::new(ElementType::F32, &input_shape)?;

        let input_data = input_tensor
            .as_slice()
            .context("Input tensor is not contiguous")?;
        unsafe {
            let tensor_data = input.get_raw_data_mut()?.as_mut_ptr() as *mut f32;
            std::ptr::copy_nonoverlapping(input_data.as_ptr(), tensor_data, input_data.len());
        }

        request.set_input_tensor(&input)?;
        request.infer()?;

        let output = request.get_output_tensor()?;
        let output_shape = output.get_shape()?;
        let output_len = output_shape
            .get_dimensions()
            .iter()
            .product::<i64>() as usize;

        if output_len != CLASS_LABELS.len() {
            anyhow::bail!(
                "Model emitted {} scores, expected {}",
                output_len,
                CLASS_LABELS.len()
            );
        }

        let scores: Vec<f32> = unsafe {
            let ptr = output.get_raw_data()?.as_ptr() as *const f32;
            std::slice::from_raw_parts(ptr, output_len).to_vec()
        };

        Ok(scores)
    }
}

impl Classifier for OpenVinoClassifier {
    fn classify(&self, image_data: &[u8]) -> Result<Prediction, ServiceError> {
        // Decode fails fast, before any runtime call.
        let image = preprocess::decode_image(image_data)?;
        let input_tensor = preprocess::to_model_input(&image);

        let scores = self
            .forward(&input_tensor)
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        Ok(select_prediction(&scores))
    }
}

/// Map a raw score vector to a prediction: argmax label (ties to the lowest
/// index) with its softmax probability.
fn select_prediction(scores: &[f32]) -> Prediction {
    let idx = argmax(scores);
    let probabilities = softmax(scores);

    Prediction {
        label: CLASS_LABELS[idx].to_string(),
        confidence: probabilities[idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prediction_picks_highest_score() {
        let prediction = select_prediction(&[2.0, -1.0]);
        assert_eq!(prediction.label, "Kırık");
        assert!(prediction.confidence > 0.5 && prediction.confidence < 1.0);

        let prediction = select_prediction(&[-3.0, 4.0]);
        assert_eq!(prediction.label, "Sağlam");
        assert!(prediction.confidence > 0.5);
    }

    #[test]
    fn test_select_prediction_tie_goes_to_lowest_index() {
        let prediction = select_prediction(&[0.5, 0.5]);
        assert_eq!(prediction.label, CLASS_LABELS[0]);
        assert!((prediction.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_stays_in_unit_interval() {
        for scores in [[-50.0, 50.0], [50.0, -50.0], [0.0, 0.0]] {
            let prediction = select_prediction(&scores);
            assert!(prediction.confidence >= 0.0 && prediction.confidence <= 1.0);
            assert!(CLASS_LABELS.contains(&prediction.label.as_str()));
        }
    }
}
