//! Account and email verification endpoints
//!
//! - Registration
//! - Confirmation links and resending them
//! - Email address changes
//! - Verification state of the signed-in account

pub mod change_email;
pub mod confirm;
pub mod register;
pub mod resend;
pub mod verification_state;

use actix_web::web;

use crate::middleware::JwtAuth;

/// Mount the users endpoints; bearer-protected resources share `jwt_secret`
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(register::register))
            .route("/confirm", web::get().to(confirm::confirm))
            .service(
                web::resource("/confirm-send")
                    .wrap(JwtAuth::with_secret(jwt_secret))
                    .route(web::post().to(resend::resend)),
            )
            .service(
                web::resource("/me/email")
                    .wrap(JwtAuth::with_secret(jwt_secret))
                    .route(web::put().to(change_email::change_email)),
            )
            .service(
                web::resource("/me/verification")
                    .wrap(JwtAuth::with_secret(jwt_secret))
                    .route(web::get().to(verification_state::verification_state)),
            ),
    );
}
