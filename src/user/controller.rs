use crate::comment::service::CommentService;
use crate::user::model::ProvisionUserRequest;
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use actix_web::{HttpResponse, web};
use serde_json::json;
use uuid::Uuid;

/// Provision a mirror user
/// POST /users
pub async fn provision_user(
    user_service: web::Data<UserService>,
    body: web::Json<ProvisionUserRequest>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let user = user_service
        .provision_user(body.user_id, body.username, body.email)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User created successfully",
        "httpStatusCode": 201,
        "data": user
    })))
}

/// List mirror users
/// GET /users
pub async fn list_users(
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let users = user_service.list_users().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Users retrieved successfully",
        "httpStatusCode": 200,
        "count": users.len(),
        "data": users
    })))
}

/// Get a mirror user
/// GET /users/{user_id}
pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service.get_user(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User retrieved successfully",
        "httpStatusCode": 200,
        "data": user
    })))
}

/// All non-deleted comments written by a user, newest first
/// GET /users/{user_id}/comments
pub async fn user_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let (user, comments) = comment_service.user_comments(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User comments retrieved successfully",
        "httpStatusCode": 200,
        "user": user,
        "count": comments.len(),
        "data": comments
    })))
}
