//! MongoDB client and collection wrapper

use std::time::Duration;

use bson::{doc, oid::ObjectId, Document};
use futures_util::StreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info, warn};

use crate::config::redact_uri;
use crate::types::ApiError;

/// Server error code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Server selection and connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Whether a driver error is a unique index violation
///
/// Inserts report it as a write error; building a unique index over
/// existing duplicates reports it as a command error.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Parse a connection string and apply short timeouts
///
/// Any database path or query options in the URI are kept as given.
pub async fn client_options(uri: &str) -> Result<ClientOptions, ApiError> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(|e| ApiError::Config(format!("Invalid MongoDB URI: {}", e)))?;
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    Ok(options)
}

/// MongoDB client wrapper
///
/// One client is created at start-up; the driver pools connections internally.
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the deployment answers a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, ApiError> {
        info!("Connecting to MongoDB at {}", redact_uri(uri));

        let options = client_options(uri).await?;
        let client = Client::with_options(options).map_err(|e| ApiError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let mongo = Self {
            client,
            db_name: db_name.to_string(),
        };
        mongo.ping().await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(mongo)
    }

    pub async fn ping(&self) -> Result<(), ApiError> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ApiError::Database(format!("MongoDB ping failed: {}", e)))?;
        Ok(())
    }

    /// Get a typed collection, creating its indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, ApiError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection with schema-declared indexes
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection handle and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, ApiError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    async fn apply_indexes(&self) -> Result<(), ApiError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        match self.inner.create_indexes(indices).await {
            Ok(_) => Ok(()),
            // Existing duplicates block a unique index; serve without it
            Err(e) if is_duplicate_key(&e) => {
                error!(
                    "Unique index on '{}' not built, existing documents collide: {}",
                    self.inner.name(),
                    e
                );
                warn!(
                    "Inserts into '{}' are not protected against duplicates until the collisions are removed",
                    self.inner.name()
                );
                Ok(())
            }
            Err(e) => Err(ApiError::Database(format!(
                "Failed to create indexes on '{}': {}",
                self.inner.name(),
                e
            ))),
        }
    }
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    /// Insert a document and return its id
    pub async fn insert_one(&self, item: &T) -> Result<ObjectId, ApiError> {
        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| ApiError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ApiError::Database("Failed to get inserted ID".into()))
    }

    /// Insert a document guarded by a unique index
    ///
    /// Returns `None` when the unique index rejects it.
    pub async fn insert_unique(&self, item: &T) -> Result<Option<ObjectId>, ApiError> {
        match self.inner.insert_one(item).await {
            Ok(result) => result
                .inserted_id
                .as_object_id()
                .map(Some)
                .ok_or_else(|| ApiError::Database("Failed to get inserted ID".into())),
            Err(e) if is_duplicate_key(&e) => Ok(None),
            Err(e) => Err(ApiError::Database(format!("Insert failed: {}", e))),
        }
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, ApiError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| ApiError::Database(format!("Find failed: {}", e)))
    }

    /// Find many documents by filter; unreadable documents are logged and skipped
    pub async fn find_many(
        &self,
        filter: Document,
        options: impl Into<Option<FindOptions>>,
    ) -> Result<Vec<T>, ApiError> {
        let cursor = self
            .inner
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| ApiError::Database(format!("Find failed: {}", e)))?;

        let results: Vec<T> = cursor
            .filter_map(|doc| async {
                match doc {
                    Ok(d) => Some(d),
                    Err(e) => {
                        error!("Error reading document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(results)
    }

    /// Update one document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, ApiError> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(|e| ApiError::Database(format!("Update failed: {}", e)))
    }

    /// Delete one document; returns the number deleted
    pub async fn delete_one(&self, filter: Document) -> Result<u64, ApiError> {
        self.inner
            .delete_one(filter)
            .await
            .map(|r| r.deleted_count)
            .map_err(|e| ApiError::Database(format!("Delete failed: {}", e)))
    }
}
