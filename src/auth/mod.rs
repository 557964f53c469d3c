use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// The authenticated principal attached to a request. Derived from
/// credentials on every request and never stored; all store operations take
/// it explicitly so data access stays scoped to its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub id: Option<u64>,
}

impl Identity {
    pub fn new(username: impl Into<String>, id: u64) -> Self {
        Self {
            username: username.into(),
            id: Some(id),
        }
    }
}

/// JWT claims carried by issued tokens: the username under `name`, the
/// numeric user id (string form) under `sub`, plus issuer/audience/timing.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(security: &SecurityConfig, identity: &Identity) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp();

        Self {
            name: identity.username.clone(),
            sub: identity.id.unwrap_or_default().to_string(),
            iss: security.jwt_issuer.clone(),
            aud: security.jwt_audience.clone(),
            iat: now.timestamp(),
            exp,
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.name,
            id: claims.sub.parse().ok(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("invalid JWT token: {0}")]
    InvalidToken(String),
}

/// Mint a signed bearer token for a verified identity.
pub fn issue_token(security: &SecurityConfig, identity: &Identity) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let claims = Claims::new(security, identity);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify a presented token and recover the identity it encodes.
///
/// Signature, issuer and audience are always checked. Expiry is only
/// enforced when `validate_token_lifetime` is set; the default leaves it
/// off, so an expired-but-correctly-signed token still validates.
pub fn validate_token(security: &SecurityConfig, token: &str) -> Result<Identity, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&security.jwt_issuer]);
    validation.set_audience(&[&security.jwt_audience]);
    if !security.validate_token_lifetime {
        validation.validate_exp = false;
        validation.required_spec_claims.remove("exp");
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(Identity::from(token_data.claims))
}
