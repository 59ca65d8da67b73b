//! Access-token claims read on the client.
//!
//! The client never holds the signing key, so tokens are decoded without
//! signature verification and only `exp` is consulted. The server stays
//! authoritative; this is used to notice a session that has already lapsed.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;

/// The subset of access-token claims the client looks at.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID (subject claim)
    #[serde(default)]
    pub sub: Option<String>,
    /// Token expiration timestamp (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Reads the claims of a JWT access token.
///
/// Returns `None` for opaque (non-JWT) tokens or tokens whose payload is
/// not a JSON object.
pub fn read_access_claims(token: &str) -> Option<AccessTokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<AccessTokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

/// Whether the access token carries an `exp` at or before `now`.
///
/// Tokens without a readable `exp` never expire on the client.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    read_access_claims(token)
        .and_then(|claims| claims.exp)
        .is_some_and(|exp| exp <= now.timestamp())
}
