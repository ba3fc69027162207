//! Request and response bodies for the users endpoints

pub mod users;

pub use users::{
    ChangeEmailRequest, ChangeEmailResponse, ConfirmQuery, RegisterRequest, RegisterResponse,
    ResendResponse, UserSummary,
};
