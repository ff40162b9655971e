use crate::comment::model::{CreateCommentRequest, ReplyRequest, UpdateCommentRequest};
use crate::comment::service::CommentService;
use crate::utils::error::CustomError;
use actix_web::{HttpResponse, web};
use serde_json::json;
use uuid::Uuid;

/// Create a new comment on a post
/// POST /comments
pub async fn create_comment(
    comment_service: web::Data<CommentService>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let comment = comment_service
        .create_comment(body.post_id, body.user_id, body.content, body.parent_comment_id)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment created successfully",
        "httpStatusCode": 201,
        "data": comment
    })))
}

/// Get a single comment with its replies and likes
/// GET /comments/{comment_id}
pub async fn get_comment(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let detail = comment_service.get_comment(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment retrieved successfully",
        "httpStatusCode": 200,
        "data": detail
    })))
}

/// Reply to an existing comment
/// POST /comments/{comment_id}/reply
pub async fn reply(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
    body: web::Json<ReplyRequest>,
) -> Result<HttpResponse, CustomError> {
    let parent_id = path.into_inner();
    let body = body.into_inner();

    // The reply inherits the parent's post unless the caller names one.
    let parent = comment_service.require_comment(parent_id).await?;
    let post_id = body.post_id.unwrap_or(parent.post_id);

    let comment = comment_service
        .create_comment(post_id, body.user_id, body.content, Some(parent_id))
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Reply created successfully",
        "httpStatusCode": 201,
        "data": comment
    })))
}

/// List direct replies of a comment
/// GET /comments/{comment_id}/replies
pub async fn list_replies(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let replies = comment_service.list_replies(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Replies retrieved successfully",
        "httpStatusCode": 200,
        "count": replies.len(),
        "data": replies
    })))
}

/// Edit a comment's content
/// PUT /comments/{comment_id}/edit
pub async fn edit_comment(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let comment = comment_service
        .edit_comment(path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment updated successfully",
        "httpStatusCode": 200,
        "data": comment
    })))
}

/// Soft delete a comment, leaving its replies in place
/// DELETE /comments/{comment_id}/soft_delete
pub async fn soft_delete(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    comment_service.soft_delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment soft deleted successfully",
        "httpStatusCode": 200
    })))
}

/// Threaded comment listing for a post
/// GET /posts/{post_id}/comments
pub async fn post_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let forest = comment_service.list_thread(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comments retrieved successfully",
        "httpStatusCode": 200,
        "count": forest.len(),
        "data": forest
    })))
}

/// Comment analytics: global counters and top-5 rankings
/// GET /comments/analytics
pub async fn analytics(
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let analytics = comment_service.analytics().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Analytics retrieved successfully",
        "httpStatusCode": 200,
        "data": analytics
    })))
}
