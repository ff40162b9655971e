use super::post_controller::{create_post, delete_post, get_post, list_posts, update_post};
use crate::comment::controller::post_comments;
use actix_web::web;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("", web::post().to(create_post))
            .route("", web::get().to(list_posts))
            .route("/{post_id}", web::get().to(get_post))
            .route("/{post_id}", web::put().to(update_post))
            .route("/{post_id}", web::delete().to(delete_post))
            .route("/{post_id}/comments", web::get().to(post_comments)),
    );
}
