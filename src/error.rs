//! Error types for the classification pipeline

use thiserror::Error;

/// Errors surfaced by the request-to-record pipeline.
///
/// Startup failures (missing model file, unreachable store) are not part of
/// this taxonomy: they abort the process from `main` before any request is
/// served.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Uploaded bytes are not a valid raster image. The model is never
    /// invoked for such a request.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The classifier runtime failed unexpectedly (shape mismatch, runtime
    /// fault). Fatal to the request.
    #[error("classifier inference failed: {0}")]
    Inference(String),

    /// The document store rejected a write or read.
    #[error("storage operation failed: {0}")]
    Persistence(#[from] mongodb::error::Error),
}
