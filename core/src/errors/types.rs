//! Error types for verification tokens and input validation

use thiserror::Error;

/// Verification token failures
///
/// `InvalidToken` and `TokenNotFound` are reported identically to external
/// callers. `TokenExpired` is an internal signal that the verification
/// service always resolves into a reissue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Absent, malformed, tampered, or encrypted under another key
    #[error("Invalid token")]
    InvalidToken,

    /// Decrypted plaintext matches no stored record
    #[error("Token not found")]
    TokenNotFound,

    #[error("Token expired")]
    TokenExpired,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email")]
    InvalidEmail,
}
