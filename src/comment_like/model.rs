use crate::user::model::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One like on a comment. The (comment_id, user_id) pair is unique.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommentLike {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateCommentLikeRequest {
    pub comment_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CommentLikeParams {
    pub comment_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CommentLikeView {
    pub id: Uuid,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
}
