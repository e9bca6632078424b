use std::{io, sync::Arc};

use actix_web::HttpServer;

use common::{
    auth::Service,
    context::effectfull_context::ServiceState,
    entities::{code::Code, envelope::Envelope, letter::Letter},
    repository::mongo_repository::MongoRepository,
    verification::verify,
};
use letters::{
    config::{Config, CODES_COLLECTION, ENVELOPES_COLLECTION, LETTERS_COLLECTION},
    create_app,
};

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(startup_error)?;

    verify::<Letter>(&config.mongo_uri, &config.database, LETTERS_COLLECTION, false)
        .await
        .map_err(startup_error)?;

    let letters: MongoRepository<Letter> =
        MongoRepository::new(&config.mongo_uri, &config.database, LETTERS_COLLECTION)
            .await
            .map_err(startup_error)?;
    let codes: MongoRepository<Code> =
        MongoRepository::new(&config.mongo_uri, &config.database, CODES_COLLECTION)
            .await
            .map_err(startup_error)?;
    let envelopes: MongoRepository<Envelope> =
        MongoRepository::new(&config.mongo_uri, &config.database, ENVELOPES_COLLECTION)
            .await
            .map_err(startup_error)?;

    let mut state = ServiceState::new(Service::Letters);
    state.insert::<Letter>(Arc::new(letters));
    state.insert::<Code>(Arc::new(codes));
    state.insert::<Envelope>(Arc::new(envelopes));
    let state = Arc::new(state);

    log::info!("{} service listening on port {}", state.service, config.port);

    HttpServer::new(move || create_app(state.clone()))
        .bind(("0.0.0.0", config.port))?
        .run()
        .await
}
