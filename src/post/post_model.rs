use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local mirror of a post owned by the posts service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// External id of the post owner. Deliberately not resolved against the
    /// local user mirror.
    pub user_id: String,
    pub description: String,
    pub post_number: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub user_id: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub description: String,
}

/// Post plus its derived non-deleted comment count.
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub comment_count: i64,
}
