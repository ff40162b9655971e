use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use serde_json::json;
use std::sync::Arc;

mod comment;
mod comment_like;
mod database;
mod middleware;
mod post;
mod post_like;
mod router;
mod store;
mod user;
mod utils;

use comment::service::CommentService;
use comment_like::service::CommentLikeService;
use middleware::not_found::not_found;
use post::post_service::PostService;
use post_like::service::PostLikeService;
use router::index::routes;
use store::mongo::MongoStore;
use user::service::UserService;
use utils::config::AppConfig;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the interactions service",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    info!(
        "Starting {} on http://localhost:{}",
        config.service_name, config.port
    );

    let mongo_client = database::db::connect_to_mongo(&config.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    let store = Arc::new(MongoStore::new(&mongo_client));
    store
        .ensure_indexes()
        .await
        .expect("Failed to create MongoDB indexes");

    let comment_service = web::Data::new(CommentService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        config.clone(),
    ));
    let comment_like_service = web::Data::new(CommentLikeService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let post_like_service = web::Data::new(PostLikeService::new(store.clone(), store.clone()));
    let post_service = web::Data::new(PostService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let user_service = web::Data::new(UserService::new(store.clone()));

    let port = config.port;

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(comment_service.clone())
            .app_data(comment_like_service.clone())
            .app_data(post_like_service.clone())
            .app_data(post_service.clone())
            .app_data(user_service.clone())
            .configure(routes)
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
            .service(default)
    })
    .bind(("localhost", port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
