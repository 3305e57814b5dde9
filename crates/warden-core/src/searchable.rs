//! Searchable encoding for short PII fields (phone numbers).
//!
//! A source string is split into overlapping 3-character windows, and each
//! window is encrypted on its own with a [`KeyedCipher`]. Because the cipher
//! is deterministic, equal windows always encrypt to equal segments, so a
//! store can answer "which records contain `123`?" by looking for the
//! ciphertext of `123` without ever decrypting a record:
//!
//! ```text
//! 18012345678 -> 180 801 012 123 234 345 456 567 678 -> enc(180),enc(801),...,enc(678)
//! ```
//!
//! Reconstruction only works for the one length the encoding was built for,
//! [`SUPPORTED_SOURCE_LEN`]. The encoded field does not carry its source
//! length, so every other length is rejected on decode.

use crate::cipher::KeyedCipher;
use crate::error::CryptoError;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, Zeroizing};

/// Characters per window.
pub const WINDOW_LEN: usize = 3;

/// Only source length that can be decoded (11-digit mobile number).
pub const SUPPORTED_SOURCE_LEN: usize = 11;

/// Separator between segments in the wire form. Never part of the base64 alphabet.
pub const SEGMENT_DELIMITER: char = ',';

/// Replacement character used by masked decoding.
pub const MASK_CHAR: char = '*';

/// Character positions (0-indexed, inclusive) replaced when masking.
const MASK_START: usize = 3;
const MASK_END: usize = 6;

// ---------------------------------------------------------------------------
// SearchableField
// ---------------------------------------------------------------------------

/// Ordered ciphertext segments, one per 3-character window of the source.
///
/// `Display` renders the wire form (segments joined by `,`); `FromStr`
/// parses it back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchableField {
    segments: Vec<String>,
}

impl SearchableField {
    /// Ciphertext segments in window order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` if the field was produced from an empty source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `true` if any segment equals `segment`, i.e. the source contained the
    /// window that `segment` was produced from.
    #[must_use]
    pub fn contains_segment(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }
}

impl fmt::Display for SearchableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEGMENT_DELIMITER}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for SearchableField {
    type Err = CryptoError;

    fn from_str(wire: &str) -> Result<Self, Self::Err> {
        if wire.is_empty() {
            return Ok(Self::default());
        }
        let segments: Vec<String> = wire.split(SEGMENT_DELIMITER).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(CryptoError::Format("empty segment in searchable field".into()));
        }
        Ok(Self { segments })
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encodes and decodes [`SearchableField`]s with a cipher it owns.
#[derive(Clone, Debug)]
pub struct SearchableFieldCodec {
    cipher: KeyedCipher,
}

impl SearchableFieldCodec {
    /// Wrap a cipher; the codec owns its key from here on.
    #[must_use]
    pub const fn new(cipher: KeyedCipher) -> Self {
        Self { cipher }
    }

    /// Encode `source` into one encrypted segment per 3-character window.
    ///
    /// - empty source: empty field
    /// - 1 or 2 characters: a single segment holding the whole source
    ///   (cannot be decoded back)
    /// - otherwise: `len - 2` segments, window `i` covering characters `i..i+3`
    ///
    /// Lengths other than [`SUPPORTED_SOURCE_LEN`] encode fine and remain
    /// searchable, but [`decode_field`](Self::decode_field) rejects them.
    #[must_use]
    pub fn encode_field(&self, source: &str) -> SearchableField {
        let chars: Zeroizing<Vec<char>> = Zeroizing::new(source.chars().collect());
        if chars.is_empty() {
            return SearchableField::default();
        }
        if chars.len() < WINDOW_LEN {
            return SearchableField {
                segments: vec![self.cipher.encrypt(source)],
            };
        }
        let segments = chars
            .windows(WINDOW_LEN)
            .map(|window| self.cipher.encrypt(&window_plaintext(window)))
            .collect();
        SearchableField { segments }
    }

    /// Decode a field produced by [`encode_field`](Self::encode_field).
    ///
    /// With `mask` set, characters 3 through 6 are replaced with `*`
    /// (`18012345678` becomes `180****5678`).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the segment count does not match
    /// [`SUPPORTED_SOURCE_LEN`], a segment fails to decrypt, a window is not
    /// exactly 3 characters, or adjacent windows do not overlap.
    pub fn decode_field(&self, field: &SearchableField, mask: bool) -> Result<String, CryptoError> {
        let expected = SUPPORTED_SOURCE_LEN.saturating_sub(WINDOW_LEN - 1);
        if field.len() != expected {
            tracing::warn!(
                segments = field.len(),
                expected,
                "rejected searchable field with unsupported length"
            );
            return Err(CryptoError::Format(format!(
                "expected {expected} segments for a {SUPPORTED_SOURCE_LEN}-character source, got {}",
                field.len()
            )));
        }

        let windows: Zeroizing<Vec<[char; WINDOW_LEN]>> = Zeroizing::new(
            field
                .segments
                .iter()
                .enumerate()
                .map(|(i, segment)| self.decrypt_window(i, segment))
                .collect::<Result<Vec<_>, _>>()?,
        );

        for (i, pair) in windows.windows(2).enumerate() {
            if pair[0][1..] != pair[1][..WINDOW_LEN - 1] {
                return Err(CryptoError::Format(format!(
                    "windows {i} and {} do not overlap",
                    i.saturating_add(1)
                )));
            }
        }

        // First character of every window but the last, then the whole last window.
        let (last, leading) = windows
            .split_last()
            .ok_or_else(|| CryptoError::Format("no windows to reconstruct".into()))?;
        let mut chars: Zeroizing<Vec<char>> =
            Zeroizing::new(leading.iter().map(|w| w[0]).collect());
        chars.extend_from_slice(last);

        if mask {
            for c in chars.iter_mut().take(MASK_END.saturating_add(1)).skip(MASK_START) {
                *c = MASK_CHAR;
            }
        }
        Ok(chars.iter().collect())
    }

    /// Parse the wire form and decode it.
    ///
    /// # Errors
    ///
    /// Same as [`decode_field`](Self::decode_field), plus `CryptoError::Format`
    /// for an empty segment in the wire form.
    pub fn decode_str(&self, wire: &str, mask: bool) -> Result<String, CryptoError> {
        self.decode_field(&wire.parse()?, mask)
    }

    /// Encrypt a 3-character query fragment. The result matches, via
    /// [`SearchableField::contains_segment`] or a column `LIKE` query, every
    /// field whose source contains the fragment at any position.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if `fragment` is not exactly 3 characters.
    pub fn search_segment(&self, fragment: &str) -> Result<String, CryptoError> {
        let len = fragment.chars().count();
        if len != WINDOW_LEN {
            return Err(CryptoError::Format(format!(
                "search fragment must be {WINDOW_LEN} characters, got {len}"
            )));
        }
        Ok(self.cipher.encrypt(fragment))
    }

    fn decrypt_window(&self, index: usize, segment: &str) -> Result<[char; WINDOW_LEN], CryptoError> {
        let window = self
            .cipher
            .decrypt(segment)
            .map_err(|e| CryptoError::Format(format!("segment {index} failed to decrypt: {e}")))?;
        let window = Zeroizing::new(window);
        let chars: Vec<char> = window.chars().collect();
        <[char; WINDOW_LEN]>::try_from(chars).map_err(|mut chars| {
            let len = chars.len();
            chars.zeroize();
            CryptoError::Format(format!(
                "segment {index} holds {len} characters, expected {WINDOW_LEN}"
            ))
        })
    }
}

/// Plaintext of one window, wiped when the caller drops it.
fn window_plaintext(window: &[char]) -> Zeroizing<String> {
    Zeroizing::new(window.iter().collect())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
