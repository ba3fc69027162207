//! Middleware for request processing

pub mod auth;

pub use auth::{issue_access_token, AuthContext, Claims, JwtAuth};
