pub mod auth;
pub mod complaints;
pub mod health;
pub mod users;

use actix_web::{error, web};

use crate::middleware::{AuthMiddleware, RequireAdmin};
use crate::services::token_service::TokenService;
use crate::utils::AppError;

/// Registers every route. Body and query parse failures answer with the
/// same JSON error shape as handler errors.
pub fn configure(cfg: &mut web::ServiceConfig, tokens: &TokenService) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::Validation(format!("invalid request body: {}", err)))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::Validation(format!("invalid query string: {}", err)))
    }))
    // Health check
    .route("/health", web::get().to(health::health_check))
    // Auth endpoints
    .service(
        web::scope("/api/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout)),
    )
    // Profile - Requires JWT
    .service(
        web::scope("/api/users")
            .wrap(AuthMiddleware::new(tokens.clone()))
            .route("/me", web::get().to(users::get_me))
            .route("/me", web::put().to(users::update_me)),
    )
    // Complaints - Requires JWT, status changes require admin
    .service(
        web::scope("/api/complaints")
            .wrap(AuthMiddleware::new(tokens.clone()))
            .route("", web::post().to(complaints::create_complaint))
            .route("", web::get().to(complaints::list_complaints))
            .route(
                "/{id}",
                web::put()
                    .to(complaints::update_complaint_status)
                    .wrap(RequireAdmin),
            )
            .route("/{id}/like", web::post().to(complaints::like_complaint))
            .route("/{id}/like", web::delete().to(complaints::unlike_complaint)),
    );
}
