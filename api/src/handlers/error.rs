use actix_web::HttpResponse;
use es_core::errors::{DomainError, TokenError, ValidationError};
use es_shared::ErrorResponse;

/// Message shared by every rejected confirmation link
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";

pub fn handle_error(error: anyhow::Error) -> HttpResponse {
    tracing::error!(error = ?error, "API error");

    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "internal_error",
        "An internal error occurred",
    ))
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        // Malformed and unknown tokens must be indistinguishable
        DomainError::Token(TokenError::InvalidToken | TokenError::TokenNotFound | TokenError::TokenExpired) => {
            HttpResponse::Forbidden().json(ErrorResponse::new("access_denied", ACCESS_DENIED_MESSAGE))
        }
        DomainError::ValidationErr(ValidationError::InvalidEmail) => HttpResponse::BadRequest().json(
            ErrorResponse::new("validation_error", "Invalid email address")
                .with_detail("field", serde_json::json!("email")),
        ),
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("validation_error", message))
        }
        DomainError::BusinessRule { message } => {
            HttpResponse::UnprocessableEntity().json(ErrorResponse::new("business_rule_violation", message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("{} not found", resource),
        )),
        DomainError::Conflict { message } => {
            HttpResponse::Conflict().json(ErrorResponse::new("conflict", message))
        }
        DomainError::Storage { message } => {
            tracing::error!(error = %message, "Storage failure");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                "An internal error occurred",
            ))
        }
        DomainError::Internal { message } => {
            tracing::error!(error = %message, "Internal failure");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                "An internal error occurred",
            ))
        }
    }
}

/// 400 response listing the failing fields of a request body
pub fn validation_error_response(errors: &validator::ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new("validation_error", "Invalid request data");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.with_detail(field, serde_json::json!(messages));
    }

    HttpResponse::BadRequest().json(response)
}
