//! HTTP route handlers

pub mod users;
