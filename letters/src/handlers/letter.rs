use actix_web::{
    delete, get, patch,
    web::{self, Json},
    HttpResponse,
};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use common::{context::GeneralContext, entities::letter::PublicLetter};

use crate::error::{LetterError, Result};
use crate::service::letter::{EnvelopeBinding, LetterChange, LetterService};

fn parse_id(id: &str) -> Result<ObjectId> {
    id.parse()
        .map_err(|_| LetterError::InvalidId(id.to_string()))
}

fn user_id(context: &GeneralContext) -> Result<ObjectId> {
    context
        .auth()
        .id()
        .copied()
        .ok_or(LetterError::Unauthenticated)
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, body = Vec<PublicLetter>)
    )
)]
#[get("/api/letter/my_letters")]
pub async fn my_letters(context: GeneralContext) -> Result<Json<Vec<PublicLetter>>> {
    let user_id = user_id(&context)?;
    Ok(Json(LetterService::new(context).my_letters(user_id).await?))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("id" = String, Path, description = "Letter id"),
    ),
    responses(
        (status = 200, body = PublicLetter),
        (status = 403, description = "Neither the author nor the reply recipient"),
        (status = 404, description = "Letter not found"),
    )
)]
#[get("/api/letter/{id}")]
pub async fn get_letter(
    context: GeneralContext,
    id: web::Path<String>,
) -> Result<Json<PublicLetter>> {
    let letter_id = parse_id(&id)?;
    let user_id = user_id(&context)?;
    Ok(Json(
        LetterService::new(context)
            .get_letter_by_id(letter_id, user_id)
            .await?,
    ))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("id" = String, Path, description = "Letter id"),
    ),
    request_body(
        content = LetterChange
    ),
    responses(
        (status = 200, body = PublicLetter),
        (status = 404, description = "Letter not found or not owned by user"),
        (status = 409, description = "Letter is not a draft"),
    )
)]
#[patch("/api/letter/{id}")]
pub async fn patch_letter(
    context: GeneralContext,
    id: web::Path<String>,
    Json(data): Json<LetterChange>,
) -> Result<Json<PublicLetter>> {
    let letter_id = parse_id(&id)?;
    let user_id = user_id(&context)?;
    Ok(Json(
        LetterService::new(context)
            .update_letter(letter_id, user_id, data)
            .await?,
    ))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("id" = String, Path, description = "Letter id"),
    ),
    responses(
        (status = 200, description = "Letter deleted"),
        (status = 404, description = "Letter not found or not owned by user"),
        (status = 409, description = "Letter is not a draft"),
    )
)]
#[delete("/api/letter/{id}")]
pub async fn delete_letter(context: GeneralContext, id: web::Path<String>) -> Result<HttpResponse> {
    let letter_id = parse_id(&id)?;
    let user_id = user_id(&context)?;
    LetterService::new(context)
        .delete_letter(letter_id, user_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    params(
        ("id" = String, Path, description = "Letter id"),
    ),
    request_body(
        content = EnvelopeBinding
    ),
    responses(
        (status = 200, description = "Number of letters matched")
    )
)]
#[patch("/api/letter/{id}/envelope")]
pub async fn patch_envelope(
    context: GeneralContext,
    id: web::Path<String>,
    Json(data): Json<EnvelopeBinding>,
) -> Result<HttpResponse> {
    let letter_id = parse_id(&id)?;
    let matched = LetterService::new(context)
        .update_envelope_binding(letter_id, &data.envelope_id)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "matched": matched })))
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header, description = "Service or admin token"),
        ("id" = String, Path, description = "Letter id"),
    ),
    responses(
        (status = 200, body = PublicLetter),
        (status = 403, description = "Not a service or admin"),
        (status = 404, description = "Letter not found"),
    )
)]
#[get("/api/letter/{id}/internal")]
pub async fn get_letter_internal(
    context: GeneralContext,
    id: web::Path<String>,
) -> Result<Json<PublicLetter>> {
    let letter_id = parse_id(&id)?;
    Ok(Json(
        LetterService::new(context)
            .get_letter_internal(letter_id)
            .await?,
    ))
}
