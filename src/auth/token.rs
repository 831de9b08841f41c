use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

/// Session token lifetime. Stateless by design: there is no revocation list,
/// so an issued token stays valid until this window passes, logout or not.
const TOKEN_TTL_HOURS: i64 = 24;

/// HS256 key pair derived from the configured session secret.
///
/// Lives in actix app data and is handed to whoever signs or verifies a
/// token, so no code path reads ambient process state for key material.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Claims carried by a session token: the user's id, their username, and the
/// expiry timestamp.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signs a session token for `user`, expiring in 24 hours.
pub fn generate_token(keys: &SessionKeys, user: &User) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id,
        name: user.username.clone(),
        exp: expiration,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a session token's signature and expiry and returns its claims.
///
/// Any failure mode — malformed token, wrong signature, expired — comes back
/// as `AppError::Unauthorized`; verification never panics on attacker input.
pub fn verify_token(keys: &SessionKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
