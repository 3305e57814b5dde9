//! Key material value types.
//!
//! - [`CipherKey`] — raw AES key (16, 24 or 32 bytes) for [`crate::cipher::KeyedCipher`]
//! - [`SigningKey`] — HMAC secret + algorithm for [`crate::token::TokenIssuer`]
//!
//! Both are immutable after construction, zeroized on drop, and print as
//! `***` in `Debug` output. Provisioning, rotation and storage of the keys are
//! the caller's responsibility.

use crate::error::CryptoError;
use crate::token::TokenAlgorithm;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// KeySize
// ---------------------------------------------------------------------------

/// AES key size selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySize {
    /// 128-bit key (16 bytes).
    Aes128,
    /// 192-bit key (24 bytes).
    Aes192,
    /// 256-bit key (32 bytes).
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Map a byte length to a key size.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` for anything but 16, 24 or 32.
    pub const fn from_len(len: usize) -> Result<Self, CryptoError> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            other => Err(CryptoError::InvalidKeyLength(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// CipherKey
// ---------------------------------------------------------------------------

/// Raw AES key owned by one [`crate::cipher::KeyedCipher`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    size: KeySize,
}

impl CipherKey {
    /// Copy `bytes` into a new key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless `bytes` is 16, 24 or 32 bytes long.
    pub fn new(bytes: &[u8]) -> Result<Self, CryptoError> {
        let size = KeySize::from_len(bytes.len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
            size,
        })
    }

    /// Generate a random key of the given size from the OS CSPRNG.
    #[must_use]
    pub fn generate(size: KeySize) -> Self {
        let mut bytes = vec![0u8; size.len()];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes, size }
    }

    /// Decode a key from standard base64.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` if the input is not base64,
    /// `CryptoError::InvalidKeyLength` if the decoded length is unsupported.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("cipher key is not base64: {e}")))?;
        let result = Self::new(&decoded);
        decoded.zeroize();
        result
    }

    /// Encode the key as standard base64 for storage in configuration.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// The key size.
    #[must_use]
    pub const fn size(&self) -> KeySize {
        self.size
    }

    /// Expose the raw key bytes. Only the cipher needs this.
    #[must_use]
    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey(***)")
    }
}

// ---------------------------------------------------------------------------
// SigningKey
// ---------------------------------------------------------------------------

/// HMAC secret plus the algorithm it is used with.
///
/// Issuance and verification must use the same `SigningKey`; replacing it
/// invalidates every token issued under the previous one.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    secret: Vec<u8>,
    #[zeroize(skip)]
    algorithm: TokenAlgorithm,
}

impl SigningKey {
    /// Build a signing key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` if `secret` is empty.
    pub fn new(secret: &[u8], algorithm: TokenAlgorithm) -> Result<Self, CryptoError> {
        if secret.is_empty() {
            return Err(CryptoError::InvalidKeyMaterial(
                "signing secret must not be empty".into(),
            ));
        }
        Ok(Self {
            secret: secret.to_vec(),
            algorithm,
        })
    }

    /// HS256 signing key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` if `secret` is empty.
    pub fn hs256(secret: &[u8]) -> Result<Self, CryptoError> {
        Self::new(secret, TokenAlgorithm::Hs256)
    }

    /// The signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> TokenAlgorithm {
        self.algorithm
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({}, ***)", self.algorithm)
    }
}
