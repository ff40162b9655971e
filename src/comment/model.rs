use crate::comment_like::model::CommentLikeView;
use crate::post::post_model::Post;
use crate::user::model::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub post_id: Uuid,
    /// Author, referencing the local user mirror row.
    pub user_id: Uuid,
    /// None marks a top-level comment, Some a reply.
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_edited: bool,
    pub is_deleted: bool,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub user_id: Uuid,
    pub content: String,
    /// Optional; when present it must match the parent's post.
    pub post_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// One node of the threaded listing, replies nested recursively.
#[derive(Debug, Serialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub user: Option<User>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub like_count: i64,
    pub reply_count: i64,
    pub is_reply: bool,
    pub replies: Vec<CommentNode>,
}

/// Flat listing entry used by the replies and per-user views.
#[derive(Debug, Serialize)]
pub struct CommentItem {
    pub id: Uuid,
    pub user: Option<User>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub like_count: i64,
    pub reply_count: i64,
    pub is_reply: bool,
}

/// Abbreviated parent shown on the detail view.
#[derive(Debug, Serialize)]
pub struct ParentCommentSummary {
    pub id: Uuid,
    pub content: String,
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct CommentDetail {
    pub id: Uuid,
    pub post: Option<Post>,
    pub user: Option<User>,
    pub parent_comment: Option<ParentCommentSummary>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub replies: Vec<CommentItem>,
    pub likes: Vec<CommentLikeView>,
    pub like_count: i64,
    pub reply_count: i64,
}

/// Global counters; `total_comments == total_replies + total_top_level`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CommentTotals {
    pub total_comments: i64,
    pub total_replies: i64,
    pub total_top_level: i64,
}

#[derive(Debug, Serialize)]
pub struct RankedPost {
    #[serde(flatten)]
    pub post: Post,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct RankedUser {
    #[serde(flatten)]
    pub user: User,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentAnalytics {
    #[serde(flatten)]
    pub totals: CommentTotals,
    pub top_posts: Vec<RankedPost>,
    pub top_users: Vec<RankedUser>,
}
