//! Component configuration.
//!
//! Each section builds one component; sections are independent and all
//! optional, so a caller that only needs password hashing can omit the rest:
//!
//! ```json
//! {
//!   "cipher":   { "key": "MDEyMzQ1Njc4OWFiY2RlZg==" },
//!   "token":    { "secret": "change-me", "algorithm": "HS256", "expire_minutes": 30 },
//!   "password": { "preset": "Interactive" }
//! }
//! ```
//!
//! Secrets are held in [`SecretString`] from the moment they are parsed and
//! only exposed while building the component that owns them.

use crate::cipher::KeyedCipher;
use crate::error::CryptoError;
use crate::keys::{CipherKey, SigningKey};
use crate::password::{Argon2idParams, PasswordHasher, PasswordPreset};
use crate::searchable::SearchableFieldCodec;
use crate::token::{TokenAlgorithm, TokenIssuer, DEFAULT_EXPIRE_MINUTES};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WardenConfig {
    #[serde(default)]
    pub cipher: Option<CipherConfig>,
    #[serde(default)]
    pub token: Option<TokenConfig>,
    #[serde(default)]
    pub password: Option<PasswordConfig>,
}

impl WardenConfig {
    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Config` if the document does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json).map_err(|e| CryptoError::Config(e.to_string()))
    }

    /// Build the keyed cipher, failing if the section is absent.
    ///
    /// # Errors
    ///
    /// `CryptoError::Config` if the section is missing, otherwise whatever
    /// [`CipherConfig::build`] returns.
    pub fn keyed_cipher(&self) -> Result<KeyedCipher, CryptoError> {
        self.cipher
            .as_ref()
            .ok_or_else(|| missing("cipher"))?
            .build()
    }

    /// Build a searchable field codec over the configured cipher key.
    ///
    /// # Errors
    ///
    /// Same as [`keyed_cipher`](Self::keyed_cipher).
    pub fn searchable_codec(&self) -> Result<SearchableFieldCodec, CryptoError> {
        self.keyed_cipher().map(SearchableFieldCodec::new)
    }

    /// Build the token issuer, failing if the section is absent.
    ///
    /// # Errors
    ///
    /// `CryptoError::Config` if the section is missing, otherwise whatever
    /// [`TokenConfig::build`] returns.
    pub fn token_issuer(&self) -> Result<TokenIssuer, CryptoError> {
        self.token.as_ref().ok_or_else(|| missing("token"))?.build()
    }

    /// Build the password hasher; an absent section means the default preset.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::PasswordHash` for invalid explicit parameters.
    pub fn password_hasher(&self) -> Result<PasswordHasher, CryptoError> {
        self.password.clone().unwrap_or_default().build()
    }
}

/// Cipher key section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CipherConfig {
    /// Standard base64 encoding of a 16, 24 or 32 byte key.
    #[serde(deserialize_with = "secret_string")]
    pub key: SecretString,
}

impl CipherConfig {
    /// # Errors
    ///
    /// `CryptoError::InvalidKeyMaterial` for non-base64 input,
    /// `CryptoError::InvalidKeyLength` for an unsupported key length.
    pub fn build(&self) -> Result<KeyedCipher, CryptoError> {
        KeyedCipher::new(CipherKey::from_base64(self.key.expose_secret())?)
    }
}

/// Token signing section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Raw HMAC secret (UTF-8).
    #[serde(deserialize_with = "secret_string")]
    pub secret: SecretString,
    #[serde(default)]
    pub algorithm: TokenAlgorithm,
    #[serde(default = "default_expire_minutes")]
    pub expire_minutes: u32,
}

impl TokenConfig {
    /// # Errors
    ///
    /// `CryptoError::InvalidKeyMaterial` if the secret is empty.
    pub fn build(&self) -> Result<TokenIssuer, CryptoError> {
        let key = SigningKey::new(self.secret.expose_secret().as_bytes(), self.algorithm)?;
        Ok(TokenIssuer::new(key, self.expire_minutes))
    }
}

/// Password hashing section. Explicit `params` win over `preset`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordConfig {
    #[serde(default)]
    pub preset: PasswordPreset,
    #[serde(default)]
    pub params: Option<Argon2idParams>,
}

impl PasswordConfig {
    /// Parameters the hasher will use.
    #[must_use]
    pub fn effective_params(&self) -> Argon2idParams {
        self.params.unwrap_or_else(|| self.preset.params())
    }

    /// # Errors
    ///
    /// Returns `CryptoError::PasswordHash` if argon2 rejects the parameters.
    pub fn build(&self) -> Result<PasswordHasher, CryptoError> {
        PasswordHasher::new(self.effective_params())
    }
}

const fn default_expire_minutes() -> u32 {
    DEFAULT_EXPIRE_MINUTES
}

fn secret_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(|s| SecretString::new(s.into_boxed_str()))
}

fn missing(section: &str) -> CryptoError {
    CryptoError::Config(format!("missing `{section}` section"))
}
