use actix_web::{web, HttpResponse};

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/users/me/verification
///
/// ```json
/// { "state": "token_pending", "expires_at": "2024-03-01T13:00:00Z" }
/// ```
pub async fn verification_state(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.verification.state(auth.user_id).await {
        Ok(verification) => HttpResponse::Ok().json(verification),
        Err(error) => handle_domain_error(error),
    }
}
