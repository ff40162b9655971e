//! Storage ports consumed by the engine services. The MongoDB adapter
//! implements them in production; tests run against an in-memory fake.

use crate::comment::model::{Comment, CommentTotals};
use crate::comment_like::model::CommentLike;
use crate::post::post_model::Post;
use crate::post_like::model::PostLike;
use crate::user::model::User;
use crate::utils::error::CustomError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

pub mod mongo;

#[cfg(test)]
pub mod memory;

/// Local mirror of users and posts owned by other services. The engines only
/// read it to validate references; a missing row is the caller's problem,
/// never a silent null.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User, CustomError>;
    async fn find_user(&self, id: &Uuid) -> Result<Option<User>, CustomError>;
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, CustomError>;
    async fn list_users(&self) -> Result<Vec<User>, CustomError>;
    async fn count_users(&self) -> Result<i64, CustomError>;

    /// Atomically allocates the next post number.
    async fn next_post_number(&self) -> Result<u32, CustomError>;
    async fn insert_post(&self, post: Post) -> Result<Post, CustomError>;
    async fn find_post(&self, id: &Uuid) -> Result<Option<Post>, CustomError>;
    async fn find_posts(&self, ids: &[Uuid]) -> Result<Vec<Post>, CustomError>;
    async fn list_posts(&self) -> Result<Vec<Post>, CustomError>;
    async fn count_posts(&self) -> Result<i64, CustomError>;
    async fn update_post_description(
        &self,
        id: &Uuid,
        description: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, CustomError>;
    async fn delete_post(&self, id: &Uuid) -> Result<bool, CustomError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError>;
    async fn find(&self, id: &Uuid) -> Result<Option<Comment>, CustomError>;
    /// Rewrites the mutable fields (content, flags, updated_at) of an
    /// existing row.
    async fn update(&self, comment: &Comment) -> Result<(), CustomError>;
    /// Every comment of a post, deleted rows included; the thread builder
    /// needs them to keep replies under soft-deleted parents.
    async fn for_post(&self, post_id: &Uuid) -> Result<Vec<Comment>, CustomError>;
    async fn for_user(&self, user_id: &Uuid) -> Result<Vec<Comment>, CustomError>;
    async fn replies_of(&self, parent_id: &Uuid) -> Result<Vec<Comment>, CustomError>;
    /// Non-deleted comment count for a post.
    async fn count_for_post(&self, post_id: &Uuid) -> Result<u64, CustomError>;
    /// Non-deleted direct children per parent, for the given parents.
    async fn count_replies(
        &self,
        parent_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, CustomError>;
    async fn totals(&self) -> Result<CommentTotals, CustomError>;
    /// Non-deleted comment counts grouped by post, count descending then
    /// post id ascending, truncated to `limit`.
    async fn count_by_post(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError>;
    async fn count_by_user(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError>;
    /// Physical removal used by the post-delete cascade; returns the removed
    /// comment ids so their likes can be swept as well.
    async fn delete_by_post(&self, post_id: &Uuid) -> Result<Vec<Uuid>, CustomError>;
}

#[async_trait]
pub trait CommentLikeStore: Send + Sync {
    /// Single check-then-insert; a duplicate (comment, user) pair fails with
    /// `Conflict` even under concurrent identical requests.
    async fn insert(&self, like: CommentLike) -> Result<CommentLike, CustomError>;
    async fn remove(&self, comment_id: &Uuid, user_id: &Uuid) -> Result<bool, CustomError>;
    async fn for_comment(&self, comment_id: &Uuid) -> Result<Vec<CommentLike>, CustomError>;
    async fn count_for_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, CustomError>;
    async fn delete_by_comments(&self, comment_ids: &[Uuid]) -> Result<u64, CustomError>;
}

#[async_trait]
pub trait PostLikeStore: Send + Sync {
    /// Same contract as `CommentLikeStore::insert`, keyed on (post, user).
    async fn insert(&self, like: PostLike) -> Result<PostLike, CustomError>;
    async fn remove(&self, post_id: &Uuid, user_id: &Uuid) -> Result<bool, CustomError>;
    async fn for_post(&self, post_id: &Uuid) -> Result<Vec<PostLike>, CustomError>;
    async fn for_user(&self, user_id: &Uuid) -> Result<Vec<PostLike>, CustomError>;
    async fn count_all(&self) -> Result<i64, CustomError>;
    async fn count_by_post(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError>;
    async fn count_by_user(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError>;
    async fn delete_by_post(&self, post_id: &Uuid) -> Result<u64, CustomError>;
}
