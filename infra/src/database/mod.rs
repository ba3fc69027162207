//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management with embedded migrations
//! - MySQL implementations of the core repository traits

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlUserRepository, MySqlVerificationRepository};
