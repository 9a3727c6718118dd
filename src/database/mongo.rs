//! MongoDB database wrapper.

use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info};

use super::error::StoreError;

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB and ping it before handing out collections.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// Create a unique index on `keys` and confirm the server reports it as unique.
///
/// Member and selection correctness rests on these indexes, so a collection
/// that ends up without one is a startup error rather than a silent race.
pub async fn ensure_unique_index<T: Send + Sync>(
    collection: &Collection<T>,
    name: &str,
    keys: Document,
) -> Result<(), StoreError> {
    let model = IndexModel::builder()
        .keys(keys.clone())
        .options(
            IndexOptions::builder()
                .unique(true)
                .name(name.to_string())
                .build(),
        )
        .build();

    collection
        .create_index(model)
        .await
        .map_err(|e| StoreError::unavailable("create_index", e))?;

    let indexes: Vec<IndexModel> = collection
        .list_indexes()
        .await
        .map_err(|e| StoreError::unavailable("list_indexes", e))?
        .try_collect()
        .await
        .map_err(|e| StoreError::unavailable("list_indexes", e))?;

    let verified = indexes.iter().any(|index| {
        index.keys == keys
            && index
                .options
                .as_ref()
                .and_then(|o| o.unique)
                .unwrap_or(false)
    });

    if !verified {
        return Err(StoreError::unavailable(
            "verify_unique_index",
            format!(
                "collection {} has no unique index on {}",
                collection.name(),
                keys
            ),
        ));
    }

    debug!("Unique index {} verified on {}", name, collection.name());
    Ok(())
}
