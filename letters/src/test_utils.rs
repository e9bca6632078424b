use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use common::{
    auth::{Auth, Service},
    context::{effectfull_context::ServiceState, GeneralContext},
    entities::{
        code::Code,
        envelope::Envelope,
        letter::{Letter, LetterStatus},
    },
    error,
    repository::{test_repository::TestRepository, Repository},
};

pub fn letter(user_id: ObjectId, reply_to: Option<ObjectId>, status: LetterStatus) -> Letter {
    let now = Utc::now().timestamp_micros();
    Letter {
        id: ObjectId::new(),
        user_id,
        reply_to,
        title: "Dear friend".to_string(),
        content: "It has been a while.".to_string(),
        style: "plain".to_string(),
        status,
        envelope_id: None,
        created_at: now,
        last_modified: now,
        deleted_at: None,
    }
}

/// In-memory letters, codes and envelopes registered in a service state.
pub struct TestStorage {
    letters: Arc<TestRepository<Letter>>,
    codes: Arc<TestRepository<Code>>,
    envelopes: Arc<TestRepository<Envelope>>,
    state: Arc<ServiceState>,
}

impl TestStorage {
    pub fn new() -> Self {
        let letters = Arc::new(TestRepository::new());
        let codes = Arc::new(TestRepository::new());
        let envelopes = Arc::new(TestRepository::new());

        let mut state = ServiceState::new(Service::Letters);
        state.insert::<Letter>(letters.clone());
        state.insert::<Code>(codes.clone());
        state.insert::<Envelope>(envelopes.clone());

        Self {
            letters,
            codes,
            envelopes,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> Arc<ServiceState> {
        self.state.clone()
    }

    pub fn context(&self, auth: Auth) -> GeneralContext {
        GeneralContext::test(self.state(), auth)
    }

    /// Context whose letters change right after every lookup.
    pub fn interfering(&self, auth: Auth, interference: Interference) -> GeneralContext {
        let mut state = ServiceState::new(Service::Letters);
        state.insert::<Letter>(Arc::new(InterferingLetters {
            inner: self.letters.clone(),
            interference,
        }));
        state.insert::<Code>(self.codes.clone());
        state.insert::<Envelope>(self.envelopes.clone());
        GeneralContext::test(Arc::new(state), auth)
    }

    pub async fn letter(&self, letter: &Letter) {
        assert!(self.letters.insert(letter).await.unwrap());
    }

    pub async fn code(&self, code: &Code) {
        assert!(self.codes.insert(code).await.unwrap());
    }

    pub async fn envelope(&self, envelope: &Envelope) {
        assert!(self.envelopes.insert(envelope).await.unwrap());
    }

    /// Stored record, soft-deleted or not.
    pub async fn stored_letter(&self, id: ObjectId) -> Letter {
        self.letters
            .find_with_deleted("_id", &Bson::ObjectId(id))
            .await
            .unwrap()
            .unwrap()
    }

    pub fn raw_letter(&self, id: ObjectId) -> Document {
        self.letters
            .db
            .lock()
            .unwrap()
            .iter()
            .find(|document| document.get_object_id("_id").ok() == Some(id))
            .cloned()
            .unwrap()
    }
}

#[derive(Clone, Copy)]
pub enum Interference {
    Delete,
    Seal,
}

/// Letters repository where another writer gets in between a lookup and the
/// write that follows it.
struct InterferingLetters {
    inner: Arc<TestRepository<Letter>>,
    interference: Interference,
}

#[async_trait]
impl Repository<Letter> for InterferingLetters {
    async fn insert(&self, item: &Letter) -> error::Result<bool> {
        self.inner.insert(item).await
    }

    async fn find(&self, field: &str, value: &Bson) -> error::Result<Option<Letter>> {
        self.inner.find(field, value).await
    }

    async fn find_by(&self, filter: Document) -> error::Result<Option<Letter>> {
        let found = self.inner.find_by(filter).await?;
        if let Some(letter) = &found {
            let by_id = doc! {"_id": letter.id};
            match self.interference {
                Interference::Delete => {
                    self.inner.soft_delete(by_id).await?;
                }
                Interference::Seal => {
                    self.inner
                        .update_fields(by_id, doc! {"status": "Sealed"})
                        .await?;
                }
            }
        }
        Ok(found)
    }

    async fn find_many(&self, field: &str, value: &Bson) -> error::Result<Vec<Letter>> {
        self.inner.find_many(field, value).await
    }

    async fn find_with_deleted(&self, field: &str, value: &Bson) -> error::Result<Option<Letter>> {
        self.inner.find_with_deleted(field, value).await
    }

    async fn update_fields(&self, filter: Document, fields: Document) -> error::Result<u64> {
        self.inner.update_fields(filter, fields).await
    }

    async fn soft_delete(&self, filter: Document) -> error::Result<bool> {
        self.inner.soft_delete(filter).await
    }
}

pub fn token(auth: Auth) -> String {
    std::env::set_var("JWT_SECRET", "letters-test-secret");
    format!("Bearer {}", auth.to_token().unwrap())
}
