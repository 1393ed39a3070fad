//! Inference engine module
//!
//! Provides OpenVINO-based inference with a fixed preprocessing pipeline:
//! decode, 224x224 resize, per-channel normalization, single forward pass.

pub mod classifier;
pub mod preprocess;

pub use classifier::{Classifier, OpenVinoClassifier, Prediction};
