//! Storage module for prediction audit records

pub mod mongo;
pub mod traits;

pub use mongo::MongoStorage;
pub use traits::{PredictionRecord, RecordStorage};
