//! Signed Token Primitives
//!
//! HS256 JWT signing and verification for the session credentials.
//! Tokens carry the subject identity, a fresh token id, and timestamps;
//! nothing here touches a store. Which secret a token is checked against decides
//! whether it is an access or a refresh credential, so the two never
//! verify interchangeably.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token verification/creation errors
///
/// `Expired` and `Invalid` are distinguished here for logging; callers
/// facing untrusted clients should collapse them into a single outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token expiry instant has been reached or passed
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch or malformed token
    #[error("Token is invalid")]
    Invalid,

    /// Token could not be created (key/serialization failure)
    #[error("Token could not be created: {0}")]
    Creation(String),
}

/// Registered claims carried by every session token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject identity (canonical user name)
    sub: String,
    /// Token id (UUID v4). Timestamps are second-granular, so without it
    /// two tokens minted in the same second would be byte-identical and
    /// share one revocation key.
    jti: String,
    /// Issued-at (Unix seconds)
    iat: i64,
    /// Expiry (Unix seconds); the token is rejected at or after this instant
    exp: i64,
}

/// Sign a subject identity into an HS256 JWT
///
/// Each call mints a distinct token: the fresh `jti` keeps concurrent
/// sessions for the same subject independently revocable.
pub fn sign(subject: &str, secret: &[u8], ttl: std::time::Duration) -> Result<String, TokenError> {
    let ttl = chrono::Duration::from_std(ttl).map_err(|e| TokenError::Creation(e.to_string()))?;
    let iat = Utc::now();
    let exp = iat + ttl;

    let claims = Claims {
        sub: subject.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        iat: iat.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Creation(e.to_string()))
}

/// Verify a token and return its subject identity
///
/// Checks the signature first, then expiry. Expiry is inclusive: a token
/// whose `exp` equals the current instant is already rejected. The expiry
/// check is done here rather than by the decoder so the boundary does not
/// depend on library leeway defaults.
pub fn verify(token: &str, secret: &[u8]) -> Result<String, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is validated below with inclusive semantics
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|_| TokenError::Invalid)?;

    if Utc::now().timestamp() >= data.claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(data.claims.sub)
}
