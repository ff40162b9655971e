use crate::post_like::model::{CreatePostLikeRequest, PostLikeParams};
use crate::post_like::service::PostLikeService;
use crate::utils::error::CustomError;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Like a post
/// POST /post-likes
pub async fn add_like(
    like_service: web::Data<PostLikeService>,
    body: web::Json<CreatePostLikeRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let like = like_service.add_like(body.post_id, body.user_id).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Post liked successfully",
        "httpStatusCode": 201,
        "data": like
    })))
}

/// Remove a like from a post
/// DELETE /post-likes/remove_like?post_id=..&user_id=..
pub async fn remove_like(
    like_service: web::Data<PostLikeService>,
    params: web::Query<PostLikeParams>,
) -> Result<HttpResponse, CustomError> {
    let params = params.into_inner();
    let (post_id, user_id) = match (params.post_id, params.user_id) {
        (Some(p), Some(u)) => (p, u),
        _ => {
            return Err(CustomError::BadRequestError(
                "Both post_id and user_id parameters are required".to_string(),
            ));
        }
    };

    like_service.remove_like(post_id, user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Like removed successfully",
        "httpStatusCode": 200,
        "post_id": post_id,
        "user_id": user_id
    })))
}

/// All likes on a post
/// GET /post-likes/post_likes?post_id=..
pub async fn post_likes(
    like_service: web::Data<PostLikeService>,
    params: web::Query<PostLikeParams>,
) -> Result<HttpResponse, CustomError> {
    let post_id = params
        .post_id
        .ok_or_else(|| CustomError::BadRequestError("post_id parameter is required".to_string()))?;

    let (post, likes) = like_service.post_likes(post_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Likes retrieved successfully",
        "httpStatusCode": 200,
        "post_id": post.id,
        "post_number": post.post_number,
        "post_description": post.description,
        "total_likes": likes.len(),
        "data": likes
    })))
}

/// Like count and liker usernames for a post
/// GET /post-likes/like_count?post_id=..
pub async fn like_count(
    like_service: web::Data<PostLikeService>,
    params: web::Query<PostLikeParams>,
) -> Result<HttpResponse, CustomError> {
    let post_id = params
        .post_id
        .ok_or_else(|| CustomError::BadRequestError("post_id parameter is required".to_string()))?;

    let (post, count, liked_by_users) = like_service.like_count(post_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Like count retrieved successfully",
        "httpStatusCode": 200,
        "post_id": post.id,
        "post_number": post.post_number,
        "like_count": count,
        "liked_by_users": liked_by_users
    })))
}

/// Posts liked by a user
/// GET /post-likes/user_likes?user_id=..
pub async fn user_likes(
    like_service: web::Data<PostLikeService>,
    params: web::Query<PostLikeParams>,
) -> Result<HttpResponse, CustomError> {
    let user_id = params
        .user_id
        .ok_or_else(|| CustomError::BadRequestError("user_id parameter is required".to_string()))?;

    let (user, liked_posts) = like_service.user_likes(user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User likes retrieved successfully",
        "httpStatusCode": 200,
        "user_id": user.id,
        "username": user.username,
        "total_likes": liked_posts.len(),
        "liked_posts": liked_posts
    })))
}

/// Like analytics: totals and top-5 rankings
/// GET /post-likes/analytics
pub async fn analytics(
    like_service: web::Data<PostLikeService>,
) -> Result<HttpResponse, CustomError> {
    let analytics = like_service.analytics().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Analytics retrieved successfully",
        "httpStatusCode": 200,
        "data": analytics
    })))
}
