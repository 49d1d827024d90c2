//! Session token minting and validation.
//!
//! # Purpose
//! Issues and validates the HS256 JWTs that carry a login session. The
//! signing secret and TTL are injected from configuration; there is no
//! process-global state here.
//!
//! # Notes
//! Validation uses zero leeway so expiry is exact. Error variants are
//! diagnostic only; every caller treats a failed validation the same way,
//! as "no authenticated user".
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Claims embedded in a session token.
///
/// `jti` makes tokens unique even when two logins land in the same second;
/// the session registry keys rows by token text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// A freshly minted token together with its expiry instant, which the
/// session registry records alongside the token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
    next_jti: AtomicI64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: ttl_secs as i64,
            next_jti: AtomicI64::new(1),
        }
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<IssuedToken, TokenError> {
        let now = now_epoch_seconds();
        let claims = SessionClaims {
            user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
            jti: self.next_jti.fetch_add(1, Ordering::SeqCst),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

pub fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
