//! AES-256-GCM token cipher

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::errors::{DomainError, DomainResult, TokenError};

use super::key::EncryptionKey;

/// Leading byte of every transport token
pub const TRANSPORT_VERSION: u8 = 0x01;

/// Associated data bound into every ciphertext
pub const TOKEN_AAD: &[u8] = b"email-verification";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Encrypts plaintext tokens into URL-safe transport tokens and back
pub trait SymmetricCipher: Send + Sync {
    /// Encrypt with a fresh random nonce; two calls never produce the same
    /// output
    fn encrypt(&self, plaintext: &str) -> DomainResult<String>;

    /// Decrypt a transport token.
    ///
    /// Anything not produced by `encrypt` under the same key fails with
    /// [`TokenError::InvalidToken`].
    fn decrypt(&self, transport_token: &str) -> Result<String, TokenError>;
}

/// AES-256-GCM cipher.
///
/// Transport layout is URL-safe base64 without padding over
/// `version || nonce || ciphertext+tag`. The version byte is part of the
/// associated data alongside [`TOKEN_AAD`].
pub struct AesGcmTokenCipher {
    cipher: Aes256Gcm,
}

impl AesGcmTokenCipher {
    /// Create a cipher bound to `key`
    pub fn new(key: &EncryptionKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    fn generate_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }

    fn aad(version: u8) -> Vec<u8> {
        let mut aad = Vec::with_capacity(1 + TOKEN_AAD.len());
        aad.push(version);
        aad.extend_from_slice(TOKEN_AAD);
        aad
    }
}

impl SymmetricCipher for AesGcmTokenCipher {
    fn encrypt(&self, plaintext: &str) -> DomainResult<String> {
        let nonce = Self::generate_nonce();
        let aad = Self::aad(TRANSPORT_VERSION);

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &aad,
                },
            )
            .map_err(|e| DomainError::Internal {
                message: format!("Encryption failed: {}", e),
            })?;

        let mut framed = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        framed.push(TRANSPORT_VERSION);
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(framed))
    }

    fn decrypt(&self, transport_token: &str) -> Result<String, TokenError> {
        let framed = URL_SAFE_NO_PAD
            .decode(transport_token.trim())
            .map_err(|_| TokenError::InvalidToken)?;

        if framed.len() < 1 + NONCE_LEN + TAG_LEN || framed[0] != TRANSPORT_VERSION {
            return Err(TokenError::InvalidToken);
        }

        let (nonce, ciphertext) = framed[1..].split_at(NONCE_LEN);
        let aad = Self::aad(framed[0]);

        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: &aad,
                },
            )
            .map_err(|_| TokenError::InvalidToken)?;

        String::from_utf8(plaintext).map_err(|_| TokenError::InvalidToken)
    }
}
