//! Service layer - request orchestration

pub mod predict_service;
pub mod types;

pub use predict_service::PredictService;
pub use types::ClassifyOutcome;
