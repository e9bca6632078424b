use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use mongodb::bson::{doc, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{live, Entity, Repository, DELETED_AT};

pub struct MongoRepository<T> {
    pub collection: mongodb::Collection<T>,
}

impl<T> MongoRepository<T> {
    pub async fn new(mongo_uri: &str, database: &str, collection: &str) -> error::Result<Self> {
        let collection = mongodb::Client::with_uri_str(mongo_uri)
            .await?
            .database(database)
            .collection(collection);
        Ok(Self { collection })
    }
}

#[async_trait]
impl<T> Repository<T> for MongoRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn insert(&self, item: &T) -> error::Result<bool> {
        let result = self
            .collection
            .find_one(doc! {"_id": item.id()}, None)
            .await?
            .is_none();

        if result {
            self.collection.insert_one(item, None).await?;
        }
        Ok(result)
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let result = self
            .collection
            .find_one(live(doc! {field: value}), None)
            .await?;
        Ok(result)
    }

    async fn find_by(&self, filter: Document) -> error::Result<Option<T>> {
        Ok(self.collection.find_one(live(filter), None).await?)
    }

    async fn find_many(&self, field: &str, value: &Bson) -> error::Result<Vec<T>> {
        let result: Vec<mongodb::error::Result<T>> = self
            .collection
            .find(live(doc! {field: value}), None)
            .await?
            .collect()
            .await;
        Ok(result.into_iter().collect::<mongodb::error::Result<_>>()?)
    }

    async fn find_with_deleted(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        Ok(self.collection.find_one(doc! {field: value}, None).await?)
    }

    async fn update_fields(&self, filter: Document, fields: Document) -> error::Result<u64> {
        let result = self
            .collection
            .update_many(live(filter), doc! {"$set": fields}, None)
            .await?;
        Ok(result.matched_count)
    }

    async fn soft_delete(&self, filter: Document) -> error::Result<bool> {
        let result = self
            .collection
            .update_one(
                live(filter),
                doc! {"$set": {DELETED_AT: Utc::now().timestamp_micros()}},
                None,
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}
