// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT issuance and verification.
//!
//! ## Token Format
//!
//! Compact JWS signed with HMAC-SHA. Claims:
//!
//! - `sub` - username of the principal
//! - `iat` - issued-at, NumericDate with millisecond precision
//! - `exp` - expires-at, NumericDate with millisecond precision
//!
//! The HMAC variant follows the key length (HS512 for 64+ bytes, HS384 for
//! 48+, HS256 for 32+). Keys are derived once at startup and never rotated.
//!
//! ## Expiry
//!
//! A token is valid while `now < exp`. No clock-skew leeway is applied.

use base64ct::{Base64, Base64UrlUnpadded, Encoding};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Minimum decoded secret length (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Errors building a codec from configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("JWT secret is not valid base64")]
    InvalidEncoding,
    #[error("JWT secret must decode to at least {MIN_SECRET_BYTES} bytes, got {0}")]
    TooShort(usize),
    #[error("JWT lifetime must be greater than zero")]
    ZeroLifetime,
}

/// Wire claims. Every field is optional on decode so that absent claims
/// surface as `MissingClaims` instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<f64>,
}

/// Claims of a token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Username the token was issued for
    pub subject: String,
    /// Issued-at, Unix epoch milliseconds (0 when the claim was absent)
    pub issued_at_ms: i64,
    /// Expires-at, Unix epoch milliseconds
    pub expires_at_ms: i64,
}

/// Signs and verifies bearer tokens with a process-wide HMAC secret.
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_ms: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("lifetime_ms", &self.lifetime_ms)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from raw secret bytes.
    pub fn new(secret: &[u8], lifetime_ms: u64) -> Result<Self, KeyError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(KeyError::TooShort(secret.len()));
        }
        if lifetime_ms == 0 {
            return Err(KeyError::ZeroLifetime);
        }

        let algorithm = match secret.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            _ => Algorithm::HS256,
        };

        // Expiry is checked by hand at millisecond precision.
        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime_ms: i64::try_from(lifetime_ms).unwrap_or(i64::MAX),
        })
    }

    /// Create a codec from a base64-encoded secret, as supplied by configuration.
    pub fn from_base64_secret(encoded: &str, lifetime_ms: u64) -> Result<Self, KeyError> {
        let secret = Base64::decode_vec(encoded.trim()).map_err(|_| KeyError::InvalidEncoding)?;
        Self::new(&secret, lifetime_ms)
    }

    /// Signing algorithm selected for the configured key.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Configured token lifetime in milliseconds.
    pub fn lifetime_ms(&self) -> i64 {
        self.lifetime_ms
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now().timestamp_millis())
    }

    pub(crate) fn issue_at(&self, subject: &str, now_ms: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: Some(subject.to_owned()),
            iat: Some(millis_to_numeric_date(now_ms)),
            exp: Some(millis_to_numeric_date(now_ms.saturating_add(self.lifetime_ms))),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify `token` against the current wall clock and return its subject.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_at(token, Utc::now().timestamp_millis())
            .map(|verified| verified.subject)
    }

    /// Verify `token` as of `now_ms` (Unix epoch milliseconds).
    pub fn verify_at(&self, token: &str, now_ms: i64) -> Result<VerifiedToken, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingClaims);
        }

        decode_header(token).map_err(|_| classify_unreadable_header(token))?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| map_decode_error(e.kind()))?;
        let claims = data.claims;

        let subject = claims
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthError::MissingClaims)?;
        let expires_at_ms = claims
            .exp
            .map(numeric_date_to_millis)
            .ok_or(AuthError::MissingClaims)?;

        if now_ms >= expires_at_ms {
            return Err(AuthError::ExpiredToken);
        }

        Ok(VerifiedToken {
            subject,
            issued_at_ms: claims.iat.map(numeric_date_to_millis).unwrap_or(0),
            expires_at_ms,
        })
    }
}

fn millis_to_numeric_date(ms: i64) -> f64 {
    ms as f64 / 1000.0
}

fn numeric_date_to_millis(secs: f64) -> i64 {
    (secs * 1000.0).round() as i64
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => AuthError::UnsupportedToken,
        ErrorKind::MissingRequiredClaim(_) => AuthError::MissingClaims,
        _ => AuthError::MalformedToken,
    }
}

/// A header that `jsonwebtoken` cannot parse is either garbage or names an
/// algorithm it does not know (`none`, for instance).
fn classify_unreadable_header(token: &str) -> AuthError {
    let Some(segment) = token.split('.').next() else {
        return AuthError::MalformedToken;
    };
    let Ok(bytes) = Base64UrlUnpadded::decode_vec(segment) else {
        return AuthError::MalformedToken;
    };
    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(header) if header.get("alg").is_some_and(|alg| alg.is_string()) => {
            AuthError::UnsupportedToken
        }
        _ => AuthError::MalformedToken,
    }
}
