//! HTTP handlers and route configuration.

mod auth;
mod files;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
///
/// Gating is per handler: `Protected` needs a signed-in user, `PublicOnly`
/// a signed-out visitor; handlers taking neither are open to everyone.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .route("/", web::get().to(posts::home))
        .service(
            web::resource("/login")
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login)),
        )
        .route("/logout", web::post().to(auth::logout))
        .route("/me", web::get().to(auth::me))
        .service(
            web::resource("/posts")
                .route(web::get().to(posts::list))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{slug}")
                .route(web::get().to(posts::show))
                .route(web::put().to(posts::update))
                .route(web::delete().to(posts::delete)),
        )
        .service(
            web::resource("/files")
                .app_data(web::PayloadConfig::new(files::MAX_UPLOAD_BYTES))
                .route(web::post().to(files::upload)),
        )
        .route("/files/{id}", web::delete().to(files::delete))
        .route("/files/{id}/preview", web::get().to(files::preview));
}
