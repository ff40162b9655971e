use crate::user::model::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One like on a post. The (post_id, user_id) pair is unique.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostLike {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreatePostLikeRequest {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct PostLikeParams {
    pub post_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PostLikeView {
    pub id: Uuid,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LikedPost {
    pub post_id: Uuid,
    pub post_number: u32,
    pub post_description: String,
    pub post_user_id: String,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MostLikedPost {
    pub post_number: u32,
    pub description: String,
    pub like_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MostActiveLiker {
    pub username: String,
    pub like_count: i64,
}

#[derive(Debug, Serialize)]
pub struct PostLikeAnalytics {
    pub total_likes: i64,
    pub total_posts: i64,
    pub total_users: i64,
    pub most_liked_posts: Vec<MostLikedPost>,
    pub most_active_likers: Vec<MostActiveLiker>,
}
