use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse};

use es_core::services::ConfirmOutcome;

use crate::dto::ConfirmQuery;
use crate::handlers::handle_domain_error;
use crate::state::AppState;

/// Handler for GET /api/v1/users/confirm?token=...
///
/// Consumes a confirmation link. Both successful outcomes redirect to the
/// landing page:
///
/// - `303` to `{landing}?verification=confirmed` when the account is verified
/// - `303` to `{landing}?verification=resent` when the link had expired and
///   a new one was sent
///
/// Absent, malformed, tampered, replayed and superseded links all get the
/// same `403 access_denied` body.
pub async fn confirm(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    // An unparseable query string is treated as a missing token
    let query = web::Query::<ConfirmQuery>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    match state.verification.confirm(query.token.as_deref()).await {
        Ok(outcome) => HttpResponse::SeeOther()
            .insert_header((LOCATION, landing_location(&state.landing_path, &outcome)))
            .finish(),
        Err(error) => handle_domain_error(error),
    }
}

/// Landing page URL carrying the confirmation result
pub fn landing_location(landing_path: &str, outcome: &ConfirmOutcome) -> String {
    let status = match outcome {
        ConfirmOutcome::Verified { .. } => "confirmed",
        ConfirmOutcome::Reissued { .. } => "resent",
    };
    let separator = if landing_path.contains('?') { '&' } else { '?' };

    format!("{}{}verification={}", landing_path, separator, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_landing_location() {
        let user_id = Uuid::new_v4();

        assert_eq!(
            landing_location("/", &ConfirmOutcome::Verified { user_id }),
            "/?verification=confirmed"
        );
        assert_eq!(
            landing_location("/welcome?lang=en", &ConfirmOutcome::Reissued { user_id }),
            "/welcome?lang=en&verification=resent"
        );
    }
}
