pub mod mongo_repository;
pub mod test_repository;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::error;

/// Field stamped by [`Repository::soft_delete`]. Records with a non-null
/// value are invisible to every lookup except [`Repository::find_with_deleted`].
pub const DELETED_AT: &str = "deleted_at";

pub trait Entity {
    fn id(&self) -> ObjectId;
}

#[async_trait]
pub trait Repository<T> {
    async fn insert(&self, item: &T) -> error::Result<bool>;
    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>>;
    async fn find_by(&self, filter: Document) -> error::Result<Option<T>>;
    async fn find_many(&self, field: &str, value: &Bson) -> error::Result<Vec<T>>;
    async fn find_with_deleted(&self, field: &str, value: &Bson) -> error::Result<Option<T>>;
    /// `$set` semantics: every key of `fields` is written as given, `Bson::Null` included.
    /// Returns the number of matched records.
    async fn update_fields(&self, filter: Document, fields: Document) -> error::Result<u64>;
    async fn soft_delete(&self, filter: Document) -> error::Result<bool>;
}

pub type RepositoryObject<T> = Arc<dyn Repository<T> + Send + Sync>;

pub(crate) fn live(mut filter: Document) -> Document {
    filter.insert(DELETED_AT, Bson::Null);
    filter
}

pub fn by_id(id: ObjectId) -> Document {
    doc! {"_id": id}
}
