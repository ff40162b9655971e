use super::controller::{add_like, analytics, like_count, post_likes, remove_like, user_likes};
use actix_web::web;

pub fn post_like_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/post-likes")
            .route("", web::post().to(add_like))
            .route("/remove_like", web::delete().to(remove_like))
            .route("/post_likes", web::get().to(post_likes))
            .route("/like_count", web::get().to(like_count))
            .route("/user_likes", web::get().to(user_likes))
            .route("/analytics", web::get().to(analytics)),
    );
}
