//! Bearer tokens: issuing them at login and verifying them on every request.

use axum::http::HeaderMap;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use chrono::{Duration, Utc};
use engine::{Identity, Role};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims signed into every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub role: api_types::Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiration, seconds since epoch.
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed token")]
    MissingToken,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// HS256 keys and token lifetime, built once from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// A lifetime too large for `Duration` saturates to the longest one it can hold.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::try_hours(ttl_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Signs a token for `identity`, valid for the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id.clone(),
            username: identity.username.clone(),
            role: wire_role(identity.role),
            iat,
            exp: iat.saturating_add(self.ttl.num_seconds()),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Extracts and validates the `Authorization: Bearer <token>` header.
    pub fn verify(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let bearer = headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(AuthError::MissingToken)?;
        self.decode_token(bearer.token())
    }

    fn decode_token(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            }
        })?;
        let claims = data.claims;
        Ok(Identity::new(
            claims.sub,
            claims.username,
            engine_role(claims.role),
        ))
    }
}

pub(crate) fn wire_role(role: Role) -> api_types::Role {
    match role {
        Role::Admin => api_types::Role::Admin,
        Role::Staff => api_types::Role::Staff,
    }
}

fn engine_role(role: api_types::Role) -> Role {
    match role {
        api_types::Role::Admin => Role::Admin,
        api_types::Role::Staff => Role::Staff,
    }
}
