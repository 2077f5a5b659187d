//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod common;
mod health;
mod likes;
mod posts;
mod users;


use actix_web::web;

use crate::middleware::error::AppError;

/// Malformed bodies, query strings and path segments become 400 problem documents.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/profile", web::get().to(auth::profile)),
            )
            .service(
                web::scope("/users")
                    .service(
                        web::resource("/me")
                            .route(web::get().to(users::me))
                            .route(web::put().to(users::update_me))
                            .route(web::delete().to(users::delete_me)),
                    )
                    .route("/{id}/status", web::put().to(users::update_status))
                    .route("/{username}", web::get().to(users::public_profile)),
            )
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(posts::list))
                            .route(web::post().to(posts::create)),
                    )
                    .route("/mine", web::get().to(posts::mine))
                    .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(posts::get))
                            .route(web::put().to(posts::update))
                            .route(web::delete().to(posts::delete)),
                    ),
            )
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/post/{post_id}", web::get().to(comments::list_for_post))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(comments::get))
                            .route(web::put().to(comments::update))
                            .route(web::delete().to(comments::delete)),
                    ),
            )
            .service(
                web::resource("/likes/post/{post_id}")
                    .route(web::get().to(likes::get))
                    .route(web::post().to(likes::like))
                    .route(web::delete().to(likes::unlike)),
            )
            .service(
                web::scope("/categories")
                    .service(
                        web::resource("")
                            .route(web::get().to(categories::list))
                            .route(web::post().to(categories::create)),
                    )
                    // GET takes a slug, writes take an id.
                    .service(
                        web::resource("/{key}")
                            .route(web::get().to(categories::get_by_slug))
                            .route(web::put().to(categories::update))
                            .route(web::delete().to(categories::delete)),
                    ),
            ),
    );
}
