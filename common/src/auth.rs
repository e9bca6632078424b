use chrono::Utc;
use derive_more::Display;
use jsonwebtoken::{
    decode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    constants::DURATION,
    error::{self, AddCode},
};

/// Rejects a missing or empty secret; an empty HMAC key would let anyone sign tokens.
pub fn signing_secret(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(anyhow::anyhow!("JWT_SECRET must be set")),
    }
}

static SECRET: Lazy<Option<String>> = Lazy::new(|| {
    signing_secret(std::env::var("JWT_SECRET").ok())
        .map_err(|err| log::error!("{}, every token will be rejected", err))
        .ok()
});

pub static ENCODING_KEY: Lazy<Option<EncodingKey>> = Lazy::new(|| {
    SECRET
        .as_deref()
        .map(|secret| EncodingKey::from_secret(secret.as_bytes()))
});

pub static DECODING_KEY: Lazy<Option<DecodingKey>> = Lazy::new(|| {
    SECRET
        .as_deref()
        .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Service {
    #[display(fmt = "letters")]
    Letters,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Auth {
    Service(String, bool),
    Admin(ObjectId),
    User(ObjectId),
    None,
}

impl Auth {
    pub fn id(&self) -> Option<&ObjectId> {
        match self {
            Auth::Admin(id) => Some(id),
            Auth::User(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Role {
    Admin,
    User,
    Service,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    role: Role,
    user_id: Option<String>,
    service_name: Option<String>,
    user_authorized: Option<bool>,
    exp: i64,
}

impl Auth {
    /// Returns `Ok(None)` when the token is well-formed but expired.
    pub fn from_token(token: &str) -> error::Result<Option<Self>> {
        let Some(key) = &*DECODING_KEY else {
            return Err(anyhow::anyhow!("No signing secret configured").code(401));
        };
        let validation = Validation::new(Algorithm::HS512);
        let claims = match decode::<Claims>(token, key, &validation) {
            Ok(data) => data.claims,
            Err(err) if matches!(err.kind(), ErrorKind::ExpiredSignature) => return Ok(None),
            Err(err) => return Err(err.code(401)),
        };

        let auth = match claims.role {
            Role::Admin => {
                let Some(id) = claims.user_id else {
                    return Err(anyhow::anyhow!("Admin token without user id").code(401));
                };
                Auth::Admin(id.parse::<ObjectId>().map_err(|e| e.code(401))?)
            }
            Role::User => {
                let Some(id) = claims.user_id else {
                    return Err(anyhow::anyhow!("User token without user id").code(401));
                };
                Auth::User(id.parse::<ObjectId>().map_err(|e| e.code(401))?)
            }
            Role::Service => {
                let Some(name) = claims.service_name else {
                    return Err(anyhow::anyhow!("Service token without name").code(401));
                };
                Auth::Service(name, claims.user_authorized.unwrap_or(false))
            }
        };

        Ok(Some(auth))
    }

    pub fn to_token(&self) -> error::Result<String> {
        let header = Header {
            alg: Algorithm::HS512,
            ..Default::default()
        };
        let exp = Utc::now().timestamp() + DURATION.num_seconds();
        let claims = match self {
            Auth::Service(name, user_auth) => Claims {
                role: Role::Service,
                user_id: None,
                service_name: Some(name.clone()),
                exp,
                user_authorized: Some(*user_auth),
            },
            Auth::Admin(id) => Claims {
                role: Role::Admin,
                user_id: Some(id.to_hex()),
                service_name: None,
                exp,
                user_authorized: None,
            },
            Auth::User(id) => Claims {
                role: Role::User,
                user_id: Some(id.to_hex()),
                service_name: None,
                exp,
                user_authorized: None,
            },
            Auth::None => {
                return Err(anyhow::anyhow!("Cannot create token for Auth::None").code(500))
            }
        };

        let Some(key) = &*ENCODING_KEY else {
            return Err(anyhow::anyhow!("No signing secret configured").code(500));
        };

        jsonwebtoken::encode(&header, &claims, key)
            .map_err(|_| anyhow::anyhow!("Failed to encode token").code(500))
    }
}
