use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{ChangeEmailRequest, ChangeEmailResponse, UserSummary};
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for PUT /api/v1/users/me/email
///
/// Replaces the account's address, marks it unverified and sends a link to
/// the new address.
///
/// ## Errors
/// - 400 Bad Request: Malformed email
/// - 409 Conflict: Address belongs to another account
/// - 422 Unprocessable Entity: Address is unchanged
pub async fn change_email(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<ChangeEmailRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.accounts.change_email(auth.user_id, &request.email).await {
        Ok(updated) => HttpResponse::Ok().json(ChangeEmailResponse {
            user: UserSummary::from(&updated.user),
            verification_expires_at: updated.receipt.expires_at,
        }),
        Err(error) => handle_domain_error(error),
    }
}
