use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repository::Entity;

/// Code issued for a letter by the letter-creation workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Code {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub letter_id: ObjectId,
    pub code: String,
    pub created_at: i64,
}

impl Entity for Code {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicCode {
    pub id: String,
    pub code: String,
    pub created_at: i64,
}

impl From<Code> for PublicCode {
    fn from(code: Code) -> Self {
        Self {
            id: code.id.to_hex(),
            code: code.code,
            created_at: code.created_at,
        }
    }
}
