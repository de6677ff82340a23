use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Identity, Role};
use crate::error::{AppError, AppResult};

pub const INVALID_TOKEN: &str = "invalid token";
pub const INCOMPLETE_CLAIMS: &str = "incomplete token claims";

/// Bearer token claims
///
/// Identity fields default to empty so a token missing them is reported as
/// incomplete rather than undecodable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

/// HS256 token issuance and verification
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            expiry: Duration::hours(expiry_hours),
        }
    }

    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: identity.user_id.to_string(),
            username: identity.username.clone(),
            role: identity.role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token and turn its claims into a trusted identity
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AppError::Unauthorized(INVALID_TOKEN)
            })?
            .claims;

        if claims.user_id.trim().is_empty()
            || claims.username.trim().is_empty()
            || claims.role.trim().is_empty()
        {
            return Err(AppError::Unauthorized(INCOMPLETE_CLAIMS));
        }

        let user_id = Uuid::parse_str(claims.user_id.trim())
            .map_err(|_| AppError::Unauthorized(INCOMPLETE_CLAIMS))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Unauthorized(INCOMPLETE_CLAIMS))?;

        Ok(Identity {
            user_id,
            username: claims.username,
            role,
        })
    }
}
