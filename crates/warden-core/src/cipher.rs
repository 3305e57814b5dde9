//! Deterministic AES-ECB encryption of short strings.
//!
//! This module provides:
//! - [`KeyedCipher`] — AES-128/192/256 in ECB mode with PKCS7 padding and
//!   base64 transport encoding
//! - [`BLOCK_LEN`] — cipher block size; decoded ciphertext is always a multiple of it
//!
//! # Determinism warning
//!
//! ECB encrypts every 16-byte block independently, so identical plaintext
//! blocks always produce identical ciphertext blocks. Encrypting the same
//! string twice with the same key yields the same ciphertext. This is what
//! makes equality lookups over encrypted columns possible, and it is also a
//! leak: repetition patterns and equal values are visible to anyone holding
//! the ciphertext.
//!
//! **Use this only for short, low-entropy identifiers that must be
//! searchable** (phone numbers, national ids). For anything else use an
//! authenticated, randomized mode.

use crate::error::CryptoError;
use crate::keys::{CipherKey, KeySize};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::crypto_common::InnerInit;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use zeroize::Zeroize;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// Expanded key schedule, one variant per supported key size.
#[derive(Clone)]
enum Engine {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// Deterministic block cipher over strings. See the module docs for the
/// security tradeoff.
///
/// Stateless given its key, so one instance can be shared across threads.
#[derive(Clone)]
pub struct KeyedCipher {
    key: CipherKey,
    engine: Engine,
}

impl KeyedCipher {
    /// Build a cipher that owns `key` for its lifetime.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` if the key schedule cannot be
    /// built for the key's length.
    pub fn new(key: CipherKey) -> Result<Self, CryptoError> {
        let raw = key.expose();
        let bad_len = |_| CryptoError::InvalidKeyLength(raw.len());
        let engine = match key.size() {
            KeySize::Aes128 => Engine::Aes128(Aes128::new_from_slice(raw).map_err(bad_len)?),
            KeySize::Aes192 => Engine::Aes192(Aes192::new_from_slice(raw).map_err(bad_len)?),
            KeySize::Aes256 => Engine::Aes256(Aes256::new_from_slice(raw).map_err(bad_len)?),
        };
        tracing::debug!(key_size = ?key.size(), "keyed cipher initialised");
        Ok(Self { key, engine })
    }

    /// Build a cipher from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless `key` is 16, 24 or 32 bytes.
    pub fn from_bytes(key: &[u8]) -> Result<Self, CryptoError> {
        Self::new(CipherKey::new(key)?)
    }

    /// Size of the key this cipher was built with.
    #[must_use]
    pub const fn key_size(&self) -> KeySize {
        self.key.size()
    }

    /// Encrypt a string: UTF-8 bytes, PKCS7 pad, AES-ECB, base64.
    #[must_use]
    pub fn encrypt(&self, plaintext: &str) -> String {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Decrypt a string produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// - `CryptoError::Decode` if the input is not base64 or the plaintext is not UTF-8
    /// - `CryptoError::Padding` if the decoded length is not a non-zero
    ///   multiple of [`BLOCK_LEN`] or the PKCS7 padding is malformed
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let bytes = self.decrypt_bytes(ciphertext)?;
        String::from_utf8(bytes).map_err(|e| {
            e.into_bytes().zeroize();
            CryptoError::Decode("decrypted bytes are not valid UTF-8".into())
        })
    }

    /// Encrypt arbitrary bytes, returning base64 ciphertext.
    #[must_use]
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> String {
        let sealed = match &self.engine {
            Engine::Aes128(c) => {
                ecb::Encryptor::<Aes128>::inner_init(c.clone()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
            }
            Engine::Aes192(c) => {
                ecb::Encryptor::<Aes192>::inner_init(c.clone()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
            }
            Engine::Aes256(c) => {
                ecb::Encryptor::<Aes256>::inner_init(c.clone()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
            }
        };
        STANDARD.encode(sealed)
    }

    /// Decrypt base64 ciphertext into raw bytes.
    ///
    /// # Errors
    ///
    /// Same as [`decrypt`](Self::decrypt), minus the UTF-8 check.
    pub fn decrypt_bytes(&self, ciphertext: &str) -> Result<Vec<u8>, CryptoError> {
        let sealed = STANDARD
            .decode(ciphertext)
            .map_err(|e| CryptoError::Decode(format!("ciphertext is not valid base64: {e}")))?;

        if sealed.is_empty() || sealed.len() % BLOCK_LEN != 0 {
            tracing::warn!(len = sealed.len(), "rejected ciphertext with unaligned length");
            return Err(CryptoError::Padding(format!(
                "ciphertext length {} is not a non-zero multiple of {BLOCK_LEN}",
                sealed.len()
            )));
        }

        let opened = match &self.engine {
            Engine::Aes128(c) => {
                ecb::Decryptor::<Aes128>::inner_init(c.clone()).decrypt_padded_vec_mut::<Pkcs7>(&sealed)
            }
            Engine::Aes192(c) => {
                ecb::Decryptor::<Aes192>::inner_init(c.clone()).decrypt_padded_vec_mut::<Pkcs7>(&sealed)
            }
            Engine::Aes256(c) => {
                ecb::Decryptor::<Aes256>::inner_init(c.clone()).decrypt_padded_vec_mut::<Pkcs7>(&sealed)
            }
        };

        opened.map_err(|_| {
            tracing::warn!("rejected ciphertext with malformed padding");
            CryptoError::Padding("malformed PKCS7 padding".into())
        })
    }
}

impl std::fmt::Debug for KeyedCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedCipher")
            .field("key", &self.key)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
