use super::controller::{add_like, comment_likes, remove_like};
use actix_web::web;

pub fn comment_like_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comment-likes")
            .route("", web::post().to(add_like))
            .route("/remove_like", web::delete().to(remove_like))
            .route("/comment_likes", web::get().to(comment_likes)),
    );
}
