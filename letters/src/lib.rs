pub mod config;
pub mod error;
pub mod handlers;
pub mod service;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceFactory;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::middleware;
use actix_web::web;
use actix_web::App;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::context::effectfull_context::ServiceState;
use common::entities::{
    code::PublicCode,
    envelope::PublicEnvelope,
    letter::{LetterStatus, PublicLetter},
};

pub use crate::handlers::letter::*;
use crate::service::letter::{EnvelopeBinding, LetterChange};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::letter::my_letters,
        handlers::letter::get_letter,
        handlers::letter::patch_letter,
        handlers::letter::delete_letter,
        handlers::letter::patch_envelope,
        handlers::letter::get_letter_internal,
    ),
    components(schemas(
        PublicLetter,
        PublicCode,
        PublicEnvelope,
        LetterStatus,
        LetterChange,
        EnvelopeBinding,
    ))
)]
pub struct ApiDoc;

pub fn create_app(
    context: Arc<ServiceState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let cors = Cors::permissive();
    App::new()
        .wrap(cors)
        .wrap(middleware::Logger::default())
        .app_data(web::Data::new(context))
        .service(my_letters)
        .service(get_letter)
        .service(get_letter_internal)
        .service(patch_letter)
        .service(patch_envelope)
        .service(delete_letter)
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
}
