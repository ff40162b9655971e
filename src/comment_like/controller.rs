use crate::comment_like::model::{CommentLikeParams, CreateCommentLikeRequest};
use crate::comment_like::service::CommentLikeService;
use crate::utils::error::CustomError;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Like a comment
/// POST /comment-likes
pub async fn add_like(
    like_service: web::Data<CommentLikeService>,
    body: web::Json<CreateCommentLikeRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let like = like_service.add_like(body.comment_id, body.user_id).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment liked successfully",
        "httpStatusCode": 201,
        "data": like
    })))
}

/// Remove a like from a comment
/// DELETE /comment-likes/remove_like?comment_id=..&user_id=..
pub async fn remove_like(
    like_service: web::Data<CommentLikeService>,
    params: web::Query<CommentLikeParams>,
) -> Result<HttpResponse, CustomError> {
    let params = params.into_inner();
    let (comment_id, user_id) = match (params.comment_id, params.user_id) {
        (Some(c), Some(u)) => (c, u),
        _ => {
            return Err(CustomError::BadRequestError(
                "Both comment_id and user_id parameters are required".to_string(),
            ));
        }
    };

    like_service.remove_like(comment_id, user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Like removed successfully",
        "httpStatusCode": 200,
        "comment_id": comment_id,
        "user_id": user_id
    })))
}

/// All likes on a comment
/// GET /comment-likes/comment_likes?comment_id=..
pub async fn comment_likes(
    like_service: web::Data<CommentLikeService>,
    params: web::Query<CommentLikeParams>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = params.comment_id.ok_or_else(|| {
        CustomError::BadRequestError("comment_id parameter is required".to_string())
    })?;

    let likes = like_service.comment_likes(comment_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Likes retrieved successfully",
        "httpStatusCode": 200,
        "comment_id": comment_id,
        "like_count": likes.len(),
        "data": likes
    })))
}
