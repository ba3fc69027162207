//! Application factory
//!
//! Builds the actix-web `App` around an already assembled [`AppState`].

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use es_shared::ErrorResponse;

use crate::routes::users;
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let jwt_secret = app_state.auth.jwt_secret.clone();

    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(web::scope("/api/v1").configure(|cfg| users::configure(cfg, &jwt_secret)))
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "events-scheduler-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Resource not found"))
}
