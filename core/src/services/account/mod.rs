//! Account registration and email management, feeding the verification
//! service.

mod service;

#[cfg(test)]
mod tests;

pub use service::{AccountService, RegisteredAccount, UpdatedEmail};
