use actix_web::{error, web, HttpRequest};

use crate::error::ApiError;
use crate::middleware::{auth::AuthMiddleware, role_auth::RequireRole};
use crate::models::user::UserRole;

pub mod auth;
pub mod city;
pub mod health;
pub mod itinerary;
pub mod mechanic;
pub mod request;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body: {}", err);
    ApiError::bad_request(format!("Invalid request body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {}", err);
    ApiError::bad_request(format!("Invalid query parameters: {}", err)).into()
}

/// Registers the full route table. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(auth::signup))
                        .route("/login", web::post().to(auth::login))
                        // Protected routes
                        .service(
                            web::scope("")
                                .wrap(AuthMiddleware)
                                .route("/me", web::get().to(auth::me)),
                        ),
                )
                .service(
                    web::scope("/cities")
                        .route("", web::get().to(city::list))
                        .route("", web::post().to(city::create))
                        .route("/{id}", web::get().to(city::get_by_id)),
                )
                .service(
                    web::scope("/itineraries")
                        .wrap(AuthMiddleware)
                        .route("", web::post().to(itinerary::create))
                        .route("", web::get().to(itinerary::list))
                        .route("/{id}", web::get().to(itinerary::get_by_id))
                        .route("/{id}", web::delete().to(itinerary::delete)),
                )
                .service(
                    web::scope("/mechanics")
                        .wrap(RequireRole::new(UserRole::Mechanic))
                        .wrap(AuthMiddleware)
                        .route("/profile", web::post().to(mechanic::create_profile))
                        .route("/profile", web::get().to(mechanic::get_profile)),
                )
                .service(
                    web::scope("/requests")
                        .wrap(AuthMiddleware)
                        .route("", web::post().to(request::create))
                        .route("/my-requests", web::get().to(request::my_requests))
                        .route("/active", web::get().to(request::active))
                        .route("/stats", web::get().to(request::stats))
                        .route("/nearby/pending", web::get().to(request::nearby_pending))
                        .route("/{id}", web::get().to(request::get_by_id))
                        .route("/{id}/cancel", web::patch().to(request::cancel))
                        .route("/{id}/accept", web::patch().to(request::accept))
                        .route("/{id}/status", web::patch().to(request::update_status)),
                ),
        );
}
