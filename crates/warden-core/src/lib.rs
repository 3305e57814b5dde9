//! `warden-core` — security primitives for WARDEN.
//!
//! Four independent, synchronous components:
//! - [`KeyedCipher`] — deterministic AES-ECB encryption of short strings
//! - [`SearchableFieldCodec`] — windowed encoding that keeps encrypted phone
//!   numbers searchable by fragment
//! - [`PasswordHasher`] — salted Argon2id hashing and verification
//! - [`TokenIssuer`] — HMAC-signed, expiring bearer tokens
//!
//! No network, no async, no global state. Key material is passed in at
//! construction and owned by the component for its lifetime.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod keys;

pub mod cipher;
pub mod searchable;

pub mod password;

pub mod token;

pub mod config;

pub use cipher::{KeyedCipher, BLOCK_LEN};
pub use config::{CipherConfig, PasswordConfig, TokenConfig, WardenConfig};
pub use error::CryptoError;
pub use keys::{CipherKey, KeySize, SigningKey};
pub use password::{Argon2idParams, PasswordHasher, PasswordPreset};
pub use searchable::{SearchableField, SearchableFieldCodec, SUPPORTED_SOURCE_LEN};
pub use token::{Claims, TokenAlgorithm, TokenIssuer, DEFAULT_EXPIRE_MINUTES, RESERVED_CLAIMS};
