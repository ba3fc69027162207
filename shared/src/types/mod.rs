//! Common type definitions shared by the HTTP layer

pub mod response;

pub use response::{ErrorResponse, MessageResponse};
