use actix_web::{web, HttpResponse};
use anyhow::Context;
use validator::Validate;

use es_shared::mask_email;

use crate::dto::{RegisterRequest, RegisterResponse, UserSummary};
use crate::handlers::{handle_domain_error, handle_error, validation_error_response};
use crate::middleware::issue_access_token;
use crate::state::AppState;

/// Handler for POST /api/v1/users/register
///
/// Creates an unverified account and emails its first confirmation link.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "ada@example.com",
///     "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "user": { "id": "...", "email": "ada@example.com", "is_verified": false, "created_at": "..." },
///     "access_token": "eyJ...",
///     "expires_in": 3600,
///     "verification_expires_at": "2024-03-01T13:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 409 Conflict: Email already registered
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        tracing::debug!(email = %mask_email(&request.email), "Rejected registration request");
        return validation_error_response(&errors);
    }

    let cost = state.bcrypt_cost;
    let password = request.password;
    let password_hash = match web::block(move || bcrypt::hash(password, cost)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => return handle_error(anyhow::Error::new(e).context("password hashing failed")),
        Err(e) => return handle_error(anyhow::Error::new(e).context("password hashing was cancelled")),
    };

    let account = match state.accounts.register(&request.email, password_hash).await {
        Ok(account) => account,
        Err(error) => return handle_domain_error(error),
    };

    let access_token = match issue_access_token(account.user.id, &state.auth)
        .context("failed to sign access token")
    {
        Ok(token) => token,
        Err(e) => return handle_error(e),
    };

    HttpResponse::Created().json(RegisterResponse {
        user: UserSummary::from(&account.user),
        access_token,
        expires_in: state.auth.access_token_expiry,
        verification_expires_at: account.receipt.expires_at,
    })
}
