//! Session token verification.
//!
//! The identity provider issues HS256 tokens carrying the user id, name
//! and the administrative-capability flag. This layer only verifies and
//! unpacks them; capability checks live in the service layer.
use std::time::{SystemTime, UNIX_EPOCH};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use service::auth::AuthIdentity;
use uuid::Uuid;

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub admin: bool,
    pub exp: u64,
}

impl From<Claims> for AuthIdentity {
    fn from(claims: Claims) -> Self {
        AuthIdentity {
            user_id: claims.sub,
            first_name: claims.first_name,
            last_name: claims.last_name,
            is_admin: claims.admin,
        }
    }
}

/// Sign a session token; used by the test harness and local tooling
/// (the real issuer is the identity provider).
pub fn issue_token(secret: &str, identity: &AuthIdentity, ttl_secs: u64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        sub: identity.user_id,
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        admin: identity.is_admin,
        exp: now + ttl_secs,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))?;
    Ok(token)
}

fn decode_identity(token: &str, secret: &str) -> Result<AuthIdentity, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;
    Ok(data.claims.into())
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string());
    if bearer.is_some() {
        return bearer;
    }
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(AUTH_COOKIE).map(|c| c.value().to_string())
}

/// The verified caller identity. Rejects with 401 when no valid token
/// is presented.
pub struct CurrentUser(pub AuthIdentity);

#[async_trait]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(ApiError::Unauthorized)?;
        let identity = decode_identity(&token, &state.auth.jwt_secret)?;
        Ok(CurrentUser(identity))
    }
}
