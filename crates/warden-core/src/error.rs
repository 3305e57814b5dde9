//! Error types for `warden-core`.

use thiserror::Error;

/// Errors produced by the security primitives.
///
/// Messages never carry key material or plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Cipher key is not 16, 24 or 32 bytes.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// Ciphertext is not valid base64, or the recovered plaintext is not UTF-8.
    #[error("decode error: {0}")]
    Decode(String),

    /// Decoded ciphertext is not block-aligned or carries malformed PKCS7 padding.
    #[error("padding error: {0}")]
    Padding(String),

    /// Searchable field has an unsupported shape or a segment failed to decrypt.
    #[error("searchable field format error: {0}")]
    Format(String),

    /// Stored password record is not a parseable Argon2 PHC string.
    #[error("invalid password record: {0}")]
    InvalidRecordFormat(String),

    /// Argon2id parameter validation or hashing failure.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Token signature does not verify under the configured key and algorithm.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Current time is at or past the token's `exp` claim.
    #[error("token has expired")]
    TokenExpired,

    /// Token is not a parseable `header.payload.signature` structure.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Caller-supplied claims contain a name reserved for the issuer.
    #[error("claim `{0}` is reserved and set by the issuer")]
    ReservedClaimConflict(String),

    /// Token could not be produced (serialization, timestamp overflow).
    #[error("token encoding failed: {0}")]
    TokenEncoding(String),

    /// Invalid key material (empty secret, bad base64 key encoding).
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Token algorithm name is not one of the supported HMAC variants.
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}
