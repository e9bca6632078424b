use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entities::{code::PublicCode, envelope::PublicEnvelope},
    repository::Entity,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum LetterStatus {
    Draft,
    Sealed,
    Sent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Letter {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub reply_to: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub style: String,
    pub status: LetterStatus,
    pub envelope_id: Option<String>,
    pub created_at: i64,
    pub last_modified: i64,
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

impl Letter {
    pub fn is_draft(&self) -> bool {
        self.status == LetterStatus::Draft
    }
}

impl Entity for Letter {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicLetter {
    pub id: String,
    pub user_id: String,
    pub reply_to: Option<String>,
    pub title: String,
    pub content: String,
    pub style: String,
    pub status: LetterStatus,
    pub envelope_id: Option<String>,
    pub code: Option<PublicCode>,
    pub envelope: Option<PublicEnvelope>,
    pub created_at: i64,
    pub last_modified: i64,
    pub deleted: bool,
}

impl PublicLetter {
    pub fn new(letter: Letter, code: Option<PublicCode>, envelope: Option<PublicEnvelope>) -> Self {
        Self {
            id: letter.id.to_hex(),
            user_id: letter.user_id.to_hex(),
            reply_to: letter.reply_to.map(|id| id.to_hex()),
            title: letter.title,
            content: letter.content,
            style: letter.style,
            status: letter.status,
            envelope_id: letter.envelope_id,
            code,
            envelope,
            created_at: letter.created_at,
            last_modified: letter.last_modified,
            deleted: letter.deleted_at.is_some(),
        }
    }
}

impl From<Letter> for PublicLetter {
    fn from(letter: Letter) -> Self {
        PublicLetter::new(letter, None, None)
    }
}
