use std::env;

use anyhow::Context;
use common::auth::signing_secret;

const DEFAULT_DATABASE: &str = "letters";
const DEFAULT_PORT: u16 = 3012;

pub const LETTERS_COLLECTION: &str = "letters";
pub const CODES_COLLECTION: &str = "codes";
pub const ENVELOPES_COLLECTION: &str = "envelopes";

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub database: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongo_uri = env::var("MONGOURI").context("MONGOURI must be set")?;
        signing_secret(env::var("JWT_SECRET").ok())?;
        let database =
            env::var("LETTERS_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
        let port = match env::var("LETTERS_PORT") {
            Ok(port) => port.parse().context("LETTERS_PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            mongo_uri,
            database,
            port,
        })
    }
}
