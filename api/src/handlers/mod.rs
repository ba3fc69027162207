//! Error translation for HTTP handlers

pub mod error;

pub use error::{handle_domain_error, handle_error, validation_error_response, ACCESS_DENIED_MESSAGE};
