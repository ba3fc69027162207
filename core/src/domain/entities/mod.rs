//! Domain entities representing core business objects.

pub mod user;
pub mod verification_record;
pub mod verification_state;


// Re-export commonly used types
pub use user::{normalize_email, User};
pub use verification_record::{
    generate_plaintext_token, VerificationRecord, TOKEN_ENTROPY_BYTES, TOKEN_MAX_LENGTH,
    TOKEN_VALIDITY_MINUTES,
};
pub use verification_state::VerificationState;
