use super::controller::{
    analytics, create_comment, edit_comment, get_comment, list_replies, reply, soft_delete,
};
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .route("", web::post().to(create_comment))
            .route("/analytics", web::get().to(analytics))
            .route("/{comment_id}", web::get().to(get_comment))
            .route("/{comment_id}/reply", web::post().to(reply))
            .route("/{comment_id}/replies", web::get().to(list_replies))
            .route("/{comment_id}/edit", web::put().to(edit_comment))
            .route("/{comment_id}/soft_delete", web::delete().to(soft_delete)),
    );
}
