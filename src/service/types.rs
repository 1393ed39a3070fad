//! Service layer types

use crate::engine::Prediction;

/// Outcome of one upload: the classification plus whether the audit record
/// made it into the store. The two are reported independently; a persistence
/// failure does not discard a computed prediction.
#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    pub filename: String,
    pub prediction: Prediction,
    pub stored: bool,
}
