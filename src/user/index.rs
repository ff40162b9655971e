use super::controller::{get_user, list_users, provision_user, user_comments};
use actix_web::web;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(provision_user))
            .route("", web::get().to(list_users))
            .route("/{user_id}", web::get().to(get_user))
            .route("/{user_id}/comments", web::get().to(user_comments)),
    );
}
