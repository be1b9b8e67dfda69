use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims of an identity token issued by the external identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Caller uid.
    pub sub: String,
    pub exp: i64,
}

impl Claims {
    pub fn new(uid: impl Into<String>, ttl: Duration) -> Self {
        Self {
            sub: uid.into(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}
