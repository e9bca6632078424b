use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use common::error::ServiceError;
use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum LetterError {
    #[display(fmt = "Letter not found")]
    NotFound,
    #[display(fmt = "User is not available to read this letter")]
    Unauthorized,
    #[display(fmt = "Letter not found or not owned by user")]
    NotFoundOrUnauthorized,
    #[display(fmt = "Only draft letters can be changed")]
    InvalidState,
    #[display(fmt = "Authentication required")]
    Unauthenticated,
    #[display(fmt = "Invalid letter id: {}", _0)]
    InvalidId(#[error(not(source))] String),
    #[display(fmt = "{}", _0)]
    Persistence(#[error(not(source))] ServiceError),
}

pub type Result<T> = std::result::Result<T, LetterError>;

impl From<ServiceError> for LetterError {
    fn from(err: ServiceError) -> Self {
        LetterError::Persistence(err)
    }
}

pub trait PersistenceContext<T> {
    fn persistence(self, context: &'static str) -> Result<T>;
}

impl<T> PersistenceContext<T> for common::error::Result<T> {
    fn persistence(self, context: &'static str) -> Result<T> {
        self.map_err(|err| {
            log::error!("{}: {}", context, err);
            LetterError::Persistence(err.context(context))
        })
    }
}

impl ResponseError for LetterError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            LetterError::NotFound | LetterError::NotFoundOrUnauthorized => StatusCode::NOT_FOUND,
            LetterError::Unauthorized => StatusCode::FORBIDDEN,
            LetterError::InvalidState => StatusCode::CONFLICT,
            LetterError::Unauthenticated => StatusCode::UNAUTHORIZED,
            LetterError::InvalidId(_) => StatusCode::BAD_REQUEST,
            LetterError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
