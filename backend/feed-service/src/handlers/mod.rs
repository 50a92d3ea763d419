pub mod comments;
pub mod feed;
pub mod friends;
pub mod health;
pub mod posts;

use actix_web::web;

use crate::metrics::serve_metrics;
use crate::middleware::JwtAuthMiddleware;

pub use feed::FeedHandlerState;

/// Register every route. `/v1` requires a bearer token; health and metrics
/// do not.
pub fn configure(cfg: &mut web::ServiceConfig, auth: JwtAuthMiddleware) {
    cfg.route("/health", web::get().to(health::liveness))
        .route("/health/ready", web::get().to(health::readiness))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/v1")
                .wrap(auth)
                .service(
                    web::resource("/post")
                        .route(web::get().to(feed::get_feed))
                        .route(web::post().to(posts::create_post)),
                )
                .route("/post/comment", web::post().to(comments::create_comment))
                .service(
                    web::resource("/friend")
                        .route(web::get().to(friends::list_friends))
                        .route(web::post().to(friends::add_friend))
                        .route(web::delete().to(friends::remove_friend)),
                ),
        );
}
