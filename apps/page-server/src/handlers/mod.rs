//! HTTP handlers and route configuration.

mod health;
mod pages;
mod preview;

use actix_web::web;

pub use preview::PREVIEW_COOKIE;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/paths", web::get().to(pages::paths))
            .route("/preview", web::get().to(preview::activate))
            .route("/exit-preview", web::get().to(preview::exit)),
    )
    .route("/post/{id}", web::get().to(pages::show));
}
