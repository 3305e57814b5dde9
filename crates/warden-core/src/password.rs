//! Salted one-way password hashing with Argon2id.
//!
//! This module provides:
//! - [`PasswordHasher`] — hash / verify / needs-rehash over PHC strings
//! - [`Argon2idParams`] — serializable parameter set
//! - [`PasswordPreset`] — Interactive / Moderate / Sensitive preset selector
//!
//! Records are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`)
//! that carry their own salt and parameters, so a record produced under old
//! parameters still verifies after the hasher is reconfigured.

use crate::error::CryptoError;
use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Argon2id parameter set.
///
/// Fields use the `argon2` crate convention:
/// - `m_cost`: memory in KiB
/// - `t_cost`: number of iterations
/// - `p_cost`: degree of parallelism
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2idParams {
    /// Memory cost in kibibytes.
    pub m_cost: u32,
    /// Number of iterations (time cost).
    pub t_cost: u32,
    /// Degree of parallelism (number of lanes).
    pub p_cost: u32,
}

impl Default for Argon2idParams {
    fn default() -> Self {
        PasswordPreset::Interactive.params()
    }
}

/// Password hashing preset selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PasswordPreset {
    /// Login-path hashing, 19 MiB / 2 passes / 1 lane.
    #[default]
    Interactive,
    /// 64 MiB / 3 passes / 4 lanes.
    Moderate,
    /// Admin or recovery credentials, 256 MiB / 4 passes / 4 lanes.
    Sensitive,
}

impl PasswordPreset {
    /// Parameters for this preset.
    #[must_use]
    pub const fn params(self) -> Argon2idParams {
        match self {
            Self::Interactive => Argon2idParams {
                m_cost: Params::DEFAULT_M_COST,
                t_cost: Params::DEFAULT_T_COST,
                p_cost: Params::DEFAULT_P_COST,
            },
            Self::Moderate => Argon2idParams {
                m_cost: 65_536,
                t_cost: 3,
                p_cost: 4,
            },
            Self::Sensitive => Argon2idParams {
                m_cost: 262_144,
                t_cost: 4,
                p_cost: 4,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Hasher
// ---------------------------------------------------------------------------

/// Argon2id password hasher.
///
/// Unlike [`crate::cipher::KeyedCipher`], hashing is deliberately
/// non-deterministic: every call draws a fresh salt.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    params: Argon2idParams,
}

impl PasswordHasher {
    /// Build a hasher with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::PasswordHash` if argon2 rejects the parameters.
    pub fn new(params: Argon2idParams) -> Result<Self, CryptoError> {
        let argon2_params = Params::new(params.m_cost, params.t_cost, params.p_cost, None)
            .map_err(|e| CryptoError::PasswordHash(format!("invalid argon2 params: {e}")))?;
        tracing::debug!(
            m_cost = params.m_cost,
            t_cost = params.t_cost,
            p_cost = params.p_cost,
            "password hasher initialised"
        );
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            params,
        })
    }

    /// Parameters new records are hashed with.
    #[must_use]
    pub const fn params(&self) -> Argon2idParams {
        self.params
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::PasswordHash` if the derivation fails.
    pub fn hash(&self, plaintext: &str) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut OsRng);
        let record = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CryptoError::PasswordHash(format!("argon2id hashing failed: {e}")))?;
        Ok(record.to_string())
    }

    /// Check `plaintext` against a stored record.
    ///
    /// The comparison is done by argon2's own verifier in constant time,
    /// using the parameters embedded in the record.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidRecordFormat` if the record is not a
    /// parseable Argon2 PHC string.
    pub fn verify(&self, plaintext: &str, record: &str) -> Result<bool, CryptoError> {
        let parsed = parse_record(record)?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::warn!("password record could not be verified: {e}");
                Err(CryptoError::InvalidRecordFormat(e.to_string()))
            }
        }
    }

    /// `true` if `record` was not produced by Argon2id v19 with this
    /// hasher's parameters, meaning it should be re-hashed after the next
    /// successful [`verify`](Self::verify).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidRecordFormat` if the record is malformed.
    pub fn needs_rehash(&self, record: &str) -> Result<bool, CryptoError> {
        let parsed = parse_record(record)?;
        if parsed.algorithm != Algorithm::Argon2id.ident()
            || parsed.version != Some(Version::V0x13.into())
        {
            return Ok(true);
        }
        let stored = Params::try_from(&parsed)
            .map_err(|e| CryptoError::InvalidRecordFormat(format!("bad argon2 params: {e}")))?;
        Ok(stored.m_cost() != self.params.m_cost
            || stored.t_cost() != self.params.t_cost
            || stored.p_cost() != self.params.p_cost)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
            params: PasswordPreset::Interactive.params(),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn parse_record(record: &str) -> Result<PasswordHash<'_>, CryptoError> {
    let parsed = PasswordHash::new(record).map_err(|e| {
        tracing::warn!("rejected malformed password record");
        CryptoError::InvalidRecordFormat(e.to_string())
    })?;
    if parsed.salt.is_none() || parsed.hash.is_none() {
        return Err(CryptoError::InvalidRecordFormat(
            "record carries no salt or hash".into(),
        ));
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
