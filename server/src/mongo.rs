//! MongoDB storage backend.
//!
//! # Design
//! Documents are stored as `{_id: ObjectId, title, completed, createdAt}`.
//! `TodoDocument` is that storage shape and is converted to and from the
//! domain `TodoItem` explicitly; the native `ObjectId` never leaves this
//! module. Every trait method is a single driver call.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use todo_core::{
    StorageError, StorageOp, StorageResult, TodoChanges, TodoId, TodoItem, TodoRepository,
};

use crate::config::Config;

/// A todo as stored in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub completed: bool,
    #[serde(
        rename = "createdAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

impl TodoDocument {
    pub fn from_item(item: &TodoItem) -> StorageResult<Self> {
        Ok(Self {
            id: object_id(&item.id, StorageOp::Insert)?,
            title: item.title.clone(),
            completed: item.completed,
            created_at: item.created_at,
        })
    }

    pub fn into_item(self) -> StorageResult<TodoItem> {
        let id = TodoId::parse(&self.id.to_hex())
            .map_err(|e| StorageError::new(StorageOp::Decode, e))?;
        Ok(TodoItem {
            id,
            title: self.title,
            completed: self.completed,
            created_at: self.created_at,
        })
    }
}

fn object_id(id: &TodoId, op: StorageOp) -> StorageResult<ObjectId> {
    ObjectId::parse_str(id.as_str()).map_err(|e| StorageError::new(op, e))
}

/// `TodoRepository` over a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoRepository {
    client: Client,
    database: Database,
    collection: Collection<TodoDocument>,
}

impl MongoRepository {
    /// Connect and ping. A failure here is fatal for the server.
    pub async fn connect(config: &Config) -> StorageResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri)
            .await
            .map_err(|e| StorageError::new(StorageOp::Connect, e))?;
        let database = client.database(&config.database);
        let collection = database.collection::<TodoDocument>(&config.collection);
        let repo = Self {
            client,
            database,
            collection,
        };
        repo.ping().await?;
        info!(
            database = %config.database,
            collection = %config.collection,
            "connected to MongoDB"
        );
        Ok(repo)
    }
}

#[async_trait]
impl TodoRepository for MongoRepository {
    async fn list(&self) -> StorageResult<Vec<TodoItem>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| StorageError::new(StorageOp::List, e))?;

        let mut items = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(|e| {
            let op = match *e.kind {
                ErrorKind::BsonDeserialization(_) => StorageOp::Decode,
                _ => StorageOp::List,
            };
            StorageError::new(op, e)
        })? {
            items.push(document.into_item()?);
        }
        Ok(items)
    }

    async fn insert(&self, item: &TodoItem) -> StorageResult<()> {
        let document = TodoDocument::from_item(item)?;
        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| StorageError::new(StorageOp::Insert, e))?;
        Ok(())
    }

    async fn update(&self, id: &TodoId, changes: &TodoChanges) -> StorageResult<bool> {
        let oid = object_id(id, StorageOp::Update)?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "title": changes.title.as_str(), "completed": changes.completed } },
            )
            .await
            .map_err(|e| StorageError::new(StorageOp::Update, e))?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &TodoId) -> StorageResult<bool> {
        let oid = object_id(id, StorageOp::Delete)?;
        let result = self
            .collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| StorageError::new(StorageOp::Delete, e))?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StorageResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::new(StorageOp::Ping, e))?;
        Ok(())
    }

    async fn close(&self) {
        debug!("closing MongoDB client");
        self.client.clone().shutdown().await;
        info!("MongoDB client closed");
    }
}
