use actix_web::{web, HttpResponse};

use crate::dto::ResendResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/v1/users/confirm-send
///
/// Issues a fresh confirmation link for the signed-in account, replacing any
/// outstanding one.
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
/// - 404 Not Found: The account no longer exists
/// - 409 Conflict: The account is already verified
pub async fn resend(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.accounts.resend_verification(auth.user_id).await {
        Ok(receipt) => {
            tracing::info!(user_id = %auth.user_id, "Verification link resent");
            HttpResponse::Accepted().json(ResendResponse {
                message: "A new confirmation link is on its way".to_string(),
                verification_expires_at: receipt.expires_at,
            })
        }
        Err(error) => handle_domain_error(error),
    }
}
