//! Key material for the token cipher

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use std::fmt;

use crate::errors::{DomainError, DomainResult};

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// 256-bit symmetric key.
///
/// The process holds exactly one key, configured at startup and handed to
/// the cipher explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Generate a fresh random key from the OS CSPRNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Build a key from raw bytes, which must be exactly [`KEY_LEN`] long
    pub fn from_bytes(bytes: &[u8]) -> DomainResult<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| DomainError::Validation {
            message: format!("Encryption key must be {} bytes, got {}", KEY_LEN, bytes.len()),
        })?;
        Ok(Self(bytes))
    }

    /// Parse a key from URL-safe base64 (padding optional)
    pub fn from_base64(encoded: &str) -> DomainResult<Self> {
        let trimmed = encoded.trim().trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(trimmed)
            .map_err(|e| DomainError::Validation {
                message: format!("Encryption key is not valid base64: {}", e),
            })?;
        Self::from_bytes(&bytes)
    }

    /// Encode the key as URL-safe base64 without padding
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}
