use crate::post::post_model::{CreatePostRequest, UpdatePostRequest};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use actix_web::{HttpResponse, web};
use serde_json::json;
use uuid::Uuid;

/// Create a mirror post
/// POST /posts
pub async fn create_post(
    post_service: web::Data<PostService>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let post = post_service.create_post(body.user_id, body.description).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Post created successfully",
        "httpStatusCode": 201,
        "data": post
    })))
}

/// List mirror posts
/// GET /posts
pub async fn list_posts(
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let posts = post_service.list_posts().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Posts retrieved successfully",
        "httpStatusCode": 200,
        "count": posts.len(),
        "data": posts
    })))
}

/// Get a mirror post with its comment count
/// GET /posts/{post_id}
pub async fn get_post(
    post_service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post retrieved successfully",
        "httpStatusCode": 200,
        "data": post
    })))
}

/// Edit a post's description
/// PUT /posts/{post_id}
pub async fn update_post(
    post_service: web::Data<PostService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service
        .update_post(path.into_inner(), body.into_inner().description)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post updated successfully",
        "httpStatusCode": 200,
        "data": post
    })))
}

/// Delete a post and cascade to its comments and likes
/// DELETE /posts/{post_id}
pub async fn delete_post(
    post_service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    post_service.delete_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post deleted successfully",
        "httpStatusCode": 200
    })))
}
