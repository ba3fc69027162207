//! JWT authentication middleware for account endpoints.
//!
//! Extracts the bearer token from the Authorization header, verifies it
//! with the configured HS256 secret, and injects an [`AuthContext`] into
//! the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use es_shared::{AuthConfig, ErrorResponse};

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Sign a short-lived access token for `user_id`
pub fn issue_access_token(
    user_id: Uuid,
    config: &AuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + config.access_token_expiry,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// Authenticated caller injected into requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

impl AuthContext {
    fn from_claims(claims: Claims) -> Result<Self, String> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid subject".to_string())?;
        Ok(Self { user_id })
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    jwt_secret: Rc<String>,
}

impl JwtAuth {
    /// Creates the middleware with the secret tokens are signed with
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            jwt_secret: Rc::clone(&self.jwt_secret),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    jwt_secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let jwt_secret = Rc::clone(&self.jwt_secret);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Ok(unauthorized(req, "Missing or invalid Authorization header"));
                }
            };

            let auth_context = match verify_token(&token, &jwt_secret) {
                Ok(context) => context,
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected bearer token");
                    return Ok(unauthorized(req, "Invalid or expired access token"));
                }
            };

            req.extensions_mut().insert(auth_context);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn unauthorized<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
    let response = HttpResponse::Unauthorized().json(ErrorResponse::new("unauthorized", message));
    req.into_response(response).map_into_right_body()
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn verify_token(token: &str, secret: &str) -> Result<AuthContext, String> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Token decode error: {}", e))?;

    AuthContext::from_claims(token_data.claims)
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }

    #[test]
    fn test_issued_token_verifies() {
        let config = AuthConfig::new("test-secret");
        let user_id = Uuid::new_v4();

        let token = issue_access_token(user_id, &config).unwrap();
        let context = verify_token(&token, "test-secret").unwrap();

        assert_eq!(context.user_id, user_id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_access_token(Uuid::new_v4(), &AuthConfig::new("test-secret")).unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_expiry: -120,
        };
        let token = issue_access_token(Uuid::new_v4(), &config).unwrap();

        assert!(verify_token(&token, "test-secret").is_err());
    }
}
