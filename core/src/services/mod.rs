//! Business services containing domain logic and use cases.

pub mod account;
pub mod delivery;
pub mod encryption;
pub mod verification;

// Re-export commonly used types
pub use account::{AccountService, RegisteredAccount, UpdatedEmail};
pub use delivery::{DeliveryOutcome, DeliveryReport, RetryPolicy, TokioDeliveryScheduler};
pub use encryption::{AesGcmTokenCipher, EncryptionKey, SymmetricCipher};
pub use verification::{
    ConfirmOutcome, DeliveryScheduler, IssueReceipt, Notifier, VerificationService,
    VerificationServiceConfig,
};
