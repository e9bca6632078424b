use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{self, doc, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error;

use super::{Entity, Repository, DELETED_AT};

/// In-memory repository with the same filter and soft-delete rules as
/// [`MongoRepository`](super::mongo_repository::MongoRepository). Filters are
/// top-level equality only; a `Bson::Null` value also matches a missing field.
pub struct TestRepository<T> {
    _t: std::marker::PhantomData<T>,
    pub db: Mutex<Vec<Document>>,
}

impl<T> Default for TestRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TestRepository<T> {
    pub fn new() -> Self {
        Self {
            _t: std::marker::PhantomData,
            db: Mutex::new(Vec::new()),
        }
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| match (document.get(key), value) {
        (None, Bson::Null) => true,
        (Some(field), value) => field == value,
        (None, _) => false,
    })
}

fn is_live(document: &Document) -> bool {
    matches!(document.get(DELETED_AT), None | Some(Bson::Null))
}

#[async_trait]
impl<T> Repository<T> for TestRepository<T>
where
    T: Entity + Send + Sync + Serialize + DeserializeOwned,
{
    async fn insert(&self, item: &T) -> error::Result<bool> {
        let document = bson::to_document(item)?;
        let mut db = self.db.lock().unwrap();

        let filter = doc! {"_id": item.id()};
        let contains = db.iter().any(|x| matches(x, &filter));
        if !contains {
            db.push(document);
        }
        Ok(!contains)
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        self.find_by(doc! {field: value.clone()}).await
    }

    async fn find_by(&self, filter: Document) -> error::Result<Option<T>> {
        let found = {
            let db = self.db.lock().unwrap();
            db.iter()
                .find(|x| is_live(x) && matches(x, &filter))
                .cloned()
        };
        Ok(found.map(bson::from_document).transpose()?)
    }

    async fn find_many(&self, field: &str, value: &Bson) -> error::Result<Vec<T>> {
        let filter = doc! {field: value.clone()};
        let found: Vec<Document> = {
            let db = self.db.lock().unwrap();
            db.iter()
                .filter(|x| is_live(x) && matches(x, &filter))
                .cloned()
                .collect()
        };
        Ok(found
            .into_iter()
            .map(bson::from_document)
            .collect::<Result<_, _>>()?)
    }

    async fn find_with_deleted(&self, field: &str, value: &Bson) -> error::Result<Option<T>> {
        let filter = doc! {field: value.clone()};
        let found = {
            let db = self.db.lock().unwrap();
            db.iter().find(|x| matches(x, &filter)).cloned()
        };
        Ok(found.map(bson::from_document).transpose()?)
    }

    async fn update_fields(&self, filter: Document, fields: Document) -> error::Result<u64> {
        let mut db = self.db.lock().unwrap();
        let mut matched = 0;
        for document in db.iter_mut().filter(|x| is_live(x) && matches(x, &filter)) {
            for (key, value) in fields.iter() {
                document.insert(key.clone(), value.clone());
            }
            matched += 1;
        }
        Ok(matched)
    }

    async fn soft_delete(&self, filter: Document) -> error::Result<bool> {
        let mut db = self.db.lock().unwrap();
        let Some(document) = db.iter_mut().find(|x| is_live(x) && matches(x, &filter)) else {
            return Ok(false);
        };
        document.insert(DELETED_AT, Utc::now().timestamp_micros());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, oid::ObjectId, Bson};
    use serde::{Deserialize, Serialize};

    use super::TestRepository;
    use crate::repository::{by_id, Entity, Repository};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        #[serde(rename = "_id")]
        id: ObjectId,
        owner: ObjectId,
        tag: Option<String>,
        deleted_at: Option<i64>,
    }

    impl Entity for Item {
        fn id(&self) -> ObjectId {
            self.id
        }
    }

    fn item(owner: ObjectId) -> Item {
        Item {
            id: ObjectId::new(),
            owner,
            tag: Some("a".to_string()),
            deleted_at: None,
        }
    }

    #[actix_web::test]
    async fn test_insert_is_idempotent() {
        let repo = TestRepository::<Item>::new();
        let item = item(ObjectId::new());
        assert!(repo.insert(&item).await.unwrap());
        assert!(!repo.insert(&item).await.unwrap());
        assert_eq!(repo.db.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_compound_filter() {
        let repo = TestRepository::<Item>::new();
        let owner = ObjectId::new();
        let item = item(owner);
        repo.insert(&item).await.unwrap();

        let found = repo
            .find_by(doc! {"_id": item.id, "owner": owner})
            .await
            .unwrap();
        assert_eq!(found, Some(item.clone()));

        let found = repo
            .find_by(doc! {"_id": item.id, "owner": ObjectId::new()})
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[actix_web::test]
    async fn test_update_fields_sets_null() {
        let repo = TestRepository::<Item>::new();
        let item = item(ObjectId::new());
        repo.insert(&item).await.unwrap();

        let matched = repo
            .update_fields(by_id(item.id), doc! {"tag": Bson::Null})
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let found = repo.find("_id", &Bson::ObjectId(item.id)).await.unwrap();
        assert_eq!(found.unwrap().tag, None);
    }

    #[actix_web::test]
    async fn test_soft_delete_hides_but_keeps() {
        let repo = TestRepository::<Item>::new();
        let owner = ObjectId::new();
        let item = item(owner);
        repo.insert(&item).await.unwrap();

        assert!(repo.soft_delete(by_id(item.id)).await.unwrap());
        assert!(!repo.soft_delete(by_id(item.id)).await.unwrap());

        let id = Bson::ObjectId(item.id);
        assert_eq!(repo.find("_id", &id).await.unwrap(), None);
        assert!(repo.find_many("owner", &Bson::ObjectId(owner)).await.unwrap().is_empty());
        assert_eq!(
            repo.update_fields(by_id(item.id), doc! {"tag": "b"}).await.unwrap(),
            0
        );

        let kept = repo.find_with_deleted("_id", &id).await.unwrap().unwrap();
        assert!(kept.deleted_at.is_some());
        assert_eq!(kept.tag, item.tag);
    }
}
