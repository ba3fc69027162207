//! Symmetric encryption of verification tokens for transport inside URLs.

mod cipher;
mod key;


pub use cipher::{AesGcmTokenCipher, SymmetricCipher, TOKEN_AAD, TRANSPORT_VERSION};
pub use key::{EncryptionKey, KEY_LEN};
