use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::{
    access_rules::{AccessRules, GetData, Read},
    context::GeneralContext,
    entities::{
        code::{Code, PublicCode},
        envelope::{Envelope, PublicEnvelope},
        letter::{Letter, PublicLetter},
    },
    repository::{by_id, RepositoryObject},
};

use crate::error::{LetterError, PersistenceContext, Result};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LetterChange {
    pub title: String,
    pub content: String,
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnvelopeBinding {
    /// Empty string unbinds the envelope.
    pub envelope_id: String,
}

/// Write filter for the owner's path. Owner and Draft status are matched in the
/// same statement as the write.
fn owned_draft_filter(letter_id: ObjectId, user_id: ObjectId) -> Document {
    doc! {"_id": letter_id, "user_id": user_id, "status": "Draft"}
}

pub struct LetterService {
    context: GeneralContext,
}

impl LetterService {
    pub fn new(context: GeneralContext) -> Self {
        Self { context }
    }

    fn letters(&self) -> Result<RepositoryObject<Letter>> {
        Ok(self.context.try_get_repository::<Letter>()?)
    }

    /// Letters the caller owns, ignoring any they soft-deleted.
    pub async fn my_letters(&self, user_id: ObjectId) -> Result<Vec<PublicLetter>> {
        let letters = self
            .letters()?
            .find_many("user_id", &Bson::ObjectId(user_id))
            .await
            .persistence("Failed to load letters")?;

        Ok(letters.into_iter().map(PublicLetter::from).collect())
    }

    pub async fn get_letter_by_id(
        &self,
        letter_id: ObjectId,
        user_id: ObjectId,
    ) -> Result<PublicLetter> {
        let Some(letter) = self
            .letters()?
            .find("_id", &Bson::ObjectId(letter_id))
            .await
            .persistence("Failed to load letter")?
        else {
            return Err(LetterError::NotFound);
        };

        if !Read.get_access(&user_id, &letter) {
            log::warn!("User {} denied read of letter {}", user_id, letter_id);
            return Err(LetterError::Unauthorized);
        }

        self.with_relations(letter).await
    }

    /// Lookup for trusted callers; soft-deleted letters are returned as well.
    pub async fn get_letter_internal(&self, letter_id: ObjectId) -> Result<PublicLetter> {
        if !GetData.get_access(self.context.auth(), ()) {
            return Err(LetterError::Unauthorized);
        }

        let Some(letter) = self
            .letters()?
            .find_with_deleted("_id", &Bson::ObjectId(letter_id))
            .await
            .persistence("Failed to load letter")?
        else {
            return Err(LetterError::NotFound);
        };

        self.with_relations(letter).await
    }

    async fn with_relations(&self, letter: Letter) -> Result<PublicLetter> {
        let codes = self.context.try_get_repository::<Code>()?;
        let code = codes
            .find("letter_id", &Bson::ObjectId(letter.id))
            .await
            .persistence("Failed to load letter code")?
            .map(PublicCode::from);

        // Identifiers that are not ObjectIds cannot name a stored envelope.
        let envelope = match letter
            .envelope_id
            .as_deref()
            .and_then(|id| id.parse::<ObjectId>().ok())
        {
            Some(envelope_id) => self
                .context
                .try_get_repository::<Envelope>()?
                .find("_id", &Bson::ObjectId(envelope_id))
                .await
                .persistence("Failed to load envelope")?
                .map(PublicEnvelope::from),
            None => None,
        };

        Ok(PublicLetter::new(letter, code, envelope))
    }

    /// Lookup on the owner's write path. Missing and foreign letters are
    /// reported the same way.
    async fn owned_draft(
        &self,
        letters: &RepositoryObject<Letter>,
        letter_id: ObjectId,
        user_id: ObjectId,
    ) -> Result<Letter> {
        let Some(letter) = letters
            .find_by(doc! {"_id": letter_id, "user_id": user_id})
            .await
            .persistence("Failed to load letter")?
        else {
            return Err(LetterError::NotFoundOrUnauthorized);
        };

        if !letter.is_draft() {
            log::warn!(
                "Letter {} is {:?}, refusing change by {}",
                letter_id,
                letter.status,
                user_id
            );
            return Err(LetterError::InvalidState);
        }

        Ok(letter)
    }

    pub async fn update_letter(
        &self,
        letter_id: ObjectId,
        user_id: ObjectId,
        change: LetterChange,
    ) -> Result<PublicLetter> {
        let letters = self.letters()?;
        let mut letter = self.owned_draft(&letters, letter_id, user_id).await?;

        let last_modified = Utc::now().timestamp_micros();
        let matched = letters
            .update_fields(
                owned_draft_filter(letter_id, user_id),
                doc! {
                    "title": change.title.as_str(),
                    "content": change.content.as_str(),
                    "style": change.style.as_str(),
                    "last_modified": last_modified,
                },
            )
            .await
            .persistence("Failed to update letter")?;

        // Deleted or sealed since the lookup.
        if matched == 0 {
            return Err(LetterError::NotFoundOrUnauthorized);
        }

        letter.title = change.title;
        letter.content = change.content;
        letter.style = change.style;
        letter.last_modified = last_modified;

        Ok(letter.into())
    }

    pub async fn delete_letter(&self, letter_id: ObjectId, user_id: ObjectId) -> Result<()> {
        let letters = self.letters()?;
        self.owned_draft(&letters, letter_id, user_id).await?;

        let deleted = letters
            .soft_delete(owned_draft_filter(letter_id, user_id))
            .await
            .persistence("Failed to delete letter")?;

        if !deleted {
            return Err(LetterError::NotFoundOrUnauthorized);
        }

        log::info!("Letter {} deleted by {}", letter_id, user_id);
        Ok(())
    }

    /// Sets or clears the envelope of every letter matching `letter_id`.
    /// Neither the caller nor the letter status is checked here, and the
    /// envelope is not required to exist.
    pub async fn update_envelope_binding(
        &self,
        letter_id: ObjectId,
        envelope_id: &str,
    ) -> Result<u64> {
        let envelope = if envelope_id.is_empty() {
            Bson::Null
        } else {
            Bson::String(envelope_id.to_string())
        };

        let matched = self
            .letters()?
            .update_fields(
                by_id(letter_id),
                doc! {
                    "envelope_id": envelope,
                    "last_modified": Utc::now().timestamp_micros(),
                },
            )
            .await
            .persistence("Failed to update envelope binding")?;

        if matched == 0 {
            log::warn!("Envelope binding matched no letter {}", letter_id);
        }

        Ok(matched)
    }
}
