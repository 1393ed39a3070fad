//! MongoDB storage implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::error::ServiceError;

use super::traits::{PredictionRecord, RecordStorage};

/// MongoDB-backed record storage.
///
/// One client for the process lifetime, bound to a fixed database and
/// collection. Reachability is verified once at startup and never retried.
pub struct MongoStorage {
    collection: Collection<PredictionRecord>,
}

impl MongoStorage {
    /// Connect to the document store and verify it is reachable.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .with_context(|| format!("Failed to build MongoDB client for {}", uri))?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("MongoDB unreachable at {}", uri))?;

        info!("Connected to MongoDB: {}/{}", database, collection);

        Ok(Self {
            collection: db.collection(collection),
        })
    }
}

#[async_trait]
impl RecordStorage for MongoStorage {
    async fn append(&self, record: &PredictionRecord) -> Result<(), ServiceError> {
        self.collection.insert_one(record).await?;
        debug!("Stored prediction record for {}", record.filename);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<PredictionRecord>, ServiceError> {
        // Strip the store-internal _id; natural cursor order, no sort.
        let cursor = self
            .collection
            .find(doc! {})
            .projection(doc! { "_id": 0 })
            .await?;

        let records = cursor.try_collect().await?;
        Ok(records)
    }
}
