use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repository::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub color: String,
    pub created_at: i64,
}

impl Entity for Envelope {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PublicEnvelope {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
}

impl From<Envelope> for PublicEnvelope {
    fn from(envelope: Envelope) -> Self {
        Self {
            id: envelope.id.to_hex(),
            user_id: envelope.user_id.to_hex(),
            name: envelope.name,
            color: envelope.color,
        }
    }
}
