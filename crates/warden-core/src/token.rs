//! Signed, expiring bearer tokens (HMAC JWT, compact serialization).
//!
//! This module provides:
//! - [`TokenIssuer`] — issue and verify `header.payload.signature` tokens
//! - [`Claims`] — reserved `exp` / `iat` / `jti` plus caller claims
//! - [`TokenAlgorithm`] — HS256 / HS384 / HS512
//!
//! # Lifecycle
//!
//! A token is valid from `iat` until `exp`. From `exp` onwards (inclusive)
//! [`TokenIssuer::decode`] fails with [`CryptoError::TokenExpired`]; that is
//! terminal and callers should obtain a fresh token rather than retry.
//!
//! `jti` is a random UUID per token. It is carried for caller-side replay
//! detection or revocation lists; this module does not track it.

use crate::error::CryptoError;
use crate::keys::SigningKey;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Claim names the issuer always sets itself.
pub const RESERVED_CLAIMS: [&str; 3] = ["exp", "iat", "jti"];

/// Default validity window in minutes.
pub const DEFAULT_EXPIRE_MINUTES: u32 = 30;

// ── Algorithm ───────────────────────────────────────────────────────

/// HMAC algorithm used to sign tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenAlgorithm {
    /// HMAC-SHA256.
    #[default]
    #[serde(rename = "HS256")]
    Hs256,
    /// HMAC-SHA384.
    #[serde(rename = "HS384")]
    Hs384,
    /// HMAC-SHA512.
    #[serde(rename = "HS512")]
    Hs512,
}

impl TokenAlgorithm {
    /// Map to the corresponding `jsonwebtoken::Algorithm`.
    const fn to_jwt_algorithm(self) -> jsonwebtoken::Algorithm {
        match self {
            Self::Hs256 => jsonwebtoken::Algorithm::HS256,
            Self::Hs384 => jsonwebtoken::Algorithm::HS384,
            Self::Hs512 => jsonwebtoken::Algorithm::HS512,
        }
    }

    /// JOSE name (`HS256`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }
}

impl fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_owned())),
        }
    }
}

// ── Claims ──────────────────────────────────────────────────────────

/// Decoded token payload.
///
/// `exp` and `iat` are Unix timestamps in seconds (UTC). Caller claims live
/// in `extra` and are flattened next to the reserved ones on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiration time.
    pub exp: i64,
    /// Issued-at time.
    pub iat: i64,
    /// Unique token id.
    pub jti: String,
    /// Caller-supplied claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Look up a caller claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// `exp` as a timestamp, if representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// `iat` as a timestamp, if representable.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

// ── Issuer ──────────────────────────────────────────────────────────

/// Issues and verifies tokens under one [`SigningKey`].
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    key: SigningKey,
    default_expire_minutes: u32,
}

impl TokenIssuer {
    /// Build an issuer that signs with `key` and issues tokens valid for
    /// `default_expire_minutes`.
    #[must_use]
    pub fn new(key: SigningKey, default_expire_minutes: u32) -> Self {
        tracing::debug!(
            algorithm = %key.algorithm(),
            default_expire_minutes,
            "token issuer initialised"
        );
        Self {
            key,
            default_expire_minutes,
        }
    }

    /// Signing algorithm fixed at construction.
    #[must_use]
    pub const fn algorithm(&self) -> TokenAlgorithm {
        self.key.algorithm()
    }

    /// Validity window used by [`issue`](Self::issue).
    #[must_use]
    pub const fn default_expire_minutes(&self) -> u32 {
        self.default_expire_minutes
    }

    /// Issue a token valid for the default window.
    ///
    /// # Errors
    ///
    /// See [`encode_at`](Self::encode_at).
    pub fn issue(&self, extra: &Map<String, Value>) -> Result<String, CryptoError> {
        self.encode_at(extra, self.default_expire_minutes, Utc::now())
    }

    /// Issue a token valid for `expire_minutes` from now.
    ///
    /// # Errors
    ///
    /// See [`encode_at`](Self::encode_at).
    pub fn encode(
        &self,
        extra: &Map<String, Value>,
        expire_minutes: u32,
    ) -> Result<String, CryptoError> {
        self.encode_at(extra, expire_minutes, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// Sets `iat = now`, `exp = now + expire_minutes` and a fresh `jti`.
    ///
    /// # Errors
    ///
    /// - `CryptoError::ReservedClaimConflict` if `extra` contains `exp`, `iat` or `jti`
    /// - `CryptoError::TokenEncoding` if the expiry overflows or signing fails
    pub fn encode_at(
        &self,
        extra: &Map<String, Value>,
        expire_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<String, CryptoError> {
        if let Some(name) = RESERVED_CLAIMS.iter().find(|name| extra.contains_key(**name)) {
            return Err(CryptoError::ReservedClaimConflict((*name).to_owned()));
        }

        let expires = now
            .checked_add_signed(Duration::minutes(i64::from(expire_minutes)))
            .ok_or_else(|| CryptoError::TokenEncoding("expiry timestamp overflows".into()))?;

        let claims = Claims {
            exp: expires.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            extra: extra.clone(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(self.key.algorithm().to_jwt_algorithm()),
            &claims,
            &EncodingKey::from_secret(self.key.expose()),
        )
        .map_err(|e| CryptoError::TokenEncoding(e.to_string()))?;

        tracing::debug!(jti = %claims.jti, exp = claims.exp, "token issued");
        Ok(token)
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// See [`decode_at`](Self::decode_at).
    pub fn decode(&self, token: &str) -> Result<Claims, CryptoError> {
        self.decode_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The signature is checked first, then `exp`.
    ///
    /// # Errors
    ///
    /// - `CryptoError::InvalidSignature` if the signature does not verify, or
    ///   the header names a different algorithm than this issuer's
    /// - `CryptoError::TokenExpired` if `now >= exp`
    /// - `CryptoError::MalformedToken` if the token cannot be parsed or lacks
    ///   a reserved claim
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CryptoError> {
        let mut validation = Validation::new(self.key.algorithm().to_jwt_algorithm());
        // Expiry is checked below against `now`, with no leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        // A missing `exp` fails `Claims` deserialization instead.
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.key.expose()),
            &validation,
        )
        .map_err(map_jwt_error)?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            tracing::warn!(jti = %claims.jti, exp = claims.exp, "rejected expired token");
            return Err(CryptoError::TokenExpired);
        }
        Ok(claims)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> CryptoError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            tracing::warn!("rejected token with invalid signature");
            CryptoError::InvalidSignature
        }
        ErrorKind::ExpiredSignature => CryptoError::TokenExpired,
        _ => {
            tracing::warn!("rejected malformed token: {err}");
            CryptoError::MalformedToken(err.to_string())
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
