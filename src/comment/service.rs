use crate::comment::model::{
    Comment, CommentAnalytics, CommentDetail, CommentItem, CommentNode, ParentCommentSummary,
    RankedPost, RankedUser,
};
use crate::comment::thread;
use crate::comment_like::model::CommentLikeView;
use crate::store::{CommentLikeStore, CommentStore, IdentityStore};
use crate::user::model::User;
use crate::utils::config::AppConfig;
use crate::utils::error::CustomError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Analytics rankings are capped at the top five, like the rest of the
/// platform's dashboards.
const TOP_N: i64 = 5;

pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    likes: Arc<dyn CommentLikeStore>,
    identity: Arc<dyn IdentityStore>,
    config: AppConfig,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentStore>,
        likes: Arc<dyn CommentLikeStore>,
        identity: Arc<dyn IdentityStore>,
        config: AppConfig,
    ) -> Self {
        CommentService {
            comments,
            likes,
            identity,
            config,
        }
    }

    fn validate_content(&self, content: &str) -> Result<(), CustomError> {
        if content.trim().is_empty() {
            return Err(CustomError::ValidationError(
                "Comment content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > self.config.max_content_length {
            return Err(CustomError::ValidationError(format!(
                "Comment content exceeds {} characters",
                self.config.max_content_length
            )));
        }
        Ok(())
    }

    /// Rejects replies nesting deeper than the configured limit. Top-level
    /// comments sit at depth 0; the walk is bounded by the limit itself.
    async fn ensure_depth(&self, parent: &Comment) -> Result<(), CustomError> {
        let mut new_depth: u32 = 1;
        let mut cursor = parent.parent_comment_id;
        while let Some(ancestor_id) = cursor {
            new_depth += 1;
            if new_depth > self.config.max_reply_depth {
                return Err(CustomError::DepthExceededError(format!(
                    "Replies are limited to {} levels",
                    self.config.max_reply_depth
                )));
            }
            let ancestor = self.comments.find(&ancestor_id).await?.ok_or_else(|| {
                CustomError::InternalServerError("Comment parent chain is broken".to_string())
            })?;
            cursor = ancestor.parent_comment_id;
        }
        Ok(())
    }

    /// Add a comment to a post, optionally as a reply to an existing comment.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: String,
        parent_comment_id: Option<Uuid>,
    ) -> Result<Comment, CustomError> {
        self.validate_content(&content)?;

        if self.identity.find_user(&user_id).await?.is_none() {
            return Err(CustomError::ValidationError(
                "User reference does not resolve".to_string(),
            ));
        }
        if self.identity.find_post(&post_id).await?.is_none() {
            return Err(CustomError::ValidationError(
                "Post reference does not resolve".to_string(),
            ));
        }

        if let Some(parent_id) = parent_comment_id {
            let parent = self
                .comments
                .find(&parent_id)
                .await?
                .ok_or_else(|| CustomError::NotFoundError("Parent comment not found".to_string()))?;
            if parent.post_id != post_id {
                return Err(CustomError::ValidationError(
                    "Reply must target the same post as its parent".to_string(),
                ));
            }
            self.ensure_depth(&parent).await?;
        }

        if self.comments.count_for_post(&post_id).await? >= self.config.max_comments_per_post {
            return Err(CustomError::ValidationError(format!(
                "Post already has the maximum of {} comments",
                self.config.max_comments_per_post
            )));
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            parent_comment_id,
            content,
            created_at: now,
            updated_at: now,
            is_edited: false,
            is_deleted: false,
        };
        self.comments.insert(comment).await
    }

    /// Replace a comment's content, marking it edited.
    pub async fn edit_comment(&self, id: Uuid, content: String) -> Result<Comment, CustomError> {
        let mut comment = self
            .comments
            .find(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;
        if comment.is_deleted {
            return Err(CustomError::ValidationError(
                "Cannot edit a deleted comment".to_string(),
            ));
        }
        self.validate_content(&content)?;

        comment.content = content;
        comment.is_edited = true;
        comment.updated_at = Utc::now();
        self.comments.update(&comment).await?;
        Ok(comment)
    }

    /// Mark a comment deleted without touching its replies. Idempotent.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), CustomError> {
        let mut comment = self
            .comments
            .find(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;
        if comment.is_deleted {
            return Ok(());
        }
        comment.is_deleted = true;
        comment.updated_at = Utc::now();
        self.comments.update(&comment).await
    }

    /// Full detail view; deleted comments stay addressable here.
    pub async fn get_comment(&self, id: Uuid) -> Result<CommentDetail, CustomError> {
        let comment = self
            .comments
            .find(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;

        let post = self.identity.find_post(&comment.post_id).await?;
        let parent = match comment.parent_comment_id {
            Some(parent_id) => self.comments.find(&parent_id).await?,
            None => None,
        };
        let likes = {
            let mut likes = self.likes.for_comment(&id).await?;
            likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            likes
        };
        let replies: Vec<Comment> = self
            .replies_sorted(&id)
            .await?
            .into_iter()
            .filter(|c| !c.is_deleted)
            .collect();

        let mut user_ids: Vec<Uuid> = vec![comment.user_id];
        user_ids.extend(parent.iter().map(|p| p.user_id));
        user_ids.extend(likes.iter().map(|l| l.user_id));
        user_ids.extend(replies.iter().map(|r| r.user_id));
        user_ids.sort();
        user_ids.dedup();
        let users = self.user_map(&user_ids).await?;

        let reply_items = self.decorate(replies, &users).await?;
        let like_count = likes.len() as i64;
        let reply_count = reply_items.len() as i64;

        Ok(CommentDetail {
            id: comment.id,
            post,
            user: users.get(&comment.user_id).cloned(),
            parent_comment: parent.map(|p| ParentCommentSummary {
                id: p.id,
                content: p.content,
                user: users.get(&p.user_id).cloned(),
            }),
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            is_edited: comment.is_edited,
            is_deleted: comment.is_deleted,
            replies: reply_items,
            likes: likes
                .into_iter()
                .map(|l| CommentLikeView {
                    id: l.id,
                    user: users.get(&l.user_id).cloned(),
                    created_at: l.created_at,
                })
                .collect(),
            like_count,
            reply_count,
        })
    }

    /// Threaded listing for a post: non-deleted top-level comments in
    /// creation order, replies nested recursively.
    pub async fn list_thread(&self, post_id: Uuid) -> Result<Vec<CommentNode>, CustomError> {
        if self.identity.find_post(&post_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }
        let comments = self.comments.for_post(&post_id).await?;
        let ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
        let like_counts = self.likes.count_for_comments(&ids).await?;

        let mut user_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let users = self.user_map(&user_ids).await?;

        Ok(thread::build_forest(comments, &like_counts, &users))
    }

    /// Direct non-deleted replies, oldest first. The parent stays
    /// addressable even when soft-deleted.
    pub async fn list_replies(&self, comment_id: Uuid) -> Result<Vec<CommentItem>, CustomError> {
        if self.comments.find(&comment_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Comment not found".to_string()));
        }
        let replies: Vec<Comment> = self
            .replies_sorted(&comment_id)
            .await?
            .into_iter()
            .filter(|c| !c.is_deleted)
            .collect();

        let mut user_ids: Vec<Uuid> = replies.iter().map(|c| c.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let users = self.user_map(&user_ids).await?;
        self.decorate(replies, &users).await
    }

    /// Non-deleted comments by a mirror user, newest first.
    pub async fn user_comments(
        &self,
        user_id: Uuid,
    ) -> Result<(User, Vec<CommentItem>), CustomError> {
        let user = self
            .identity
            .find_user(&user_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("User not found".to_string()))?;

        let mut comments: Vec<Comment> = self
            .comments
            .for_user(&user_id)
            .await?
            .into_iter()
            .filter(|c| !c.is_deleted)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let mut users = HashMap::new();
        users.insert(user.id, user.clone());
        let items = self.decorate(comments, &users).await?;
        Ok((user, items))
    }

    /// Global counters plus the most commented posts and most active
    /// commenters. Ties rank by ascending identifier.
    pub async fn analytics(&self) -> Result<CommentAnalytics, CustomError> {
        let totals = self.comments.totals().await?;
        let by_post = self.comments.count_by_post(TOP_N).await?;
        let by_user = self.comments.count_by_user(TOP_N).await?;

        let post_ids: Vec<Uuid> = by_post.iter().map(|(id, _)| *id).collect();
        let user_ids: Vec<Uuid> = by_user.iter().map(|(id, _)| *id).collect();
        let posts: HashMap<Uuid, _> = self
            .identity
            .find_posts(&post_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let users = self.user_map(&user_ids).await?;

        Ok(CommentAnalytics {
            totals,
            top_posts: by_post
                .into_iter()
                .filter_map(|(id, count)| {
                    posts.get(&id).cloned().map(|post| RankedPost {
                        post,
                        comment_count: count,
                    })
                })
                .collect(),
            top_users: by_user
                .into_iter()
                .filter_map(|(id, count)| {
                    users.get(&id).cloned().map(|user| RankedUser {
                        user,
                        comment_count: count,
                    })
                })
                .collect(),
        })
    }

    /// Look up a comment that must exist, e.g. the parent of a reply.
    pub async fn require_comment(&self, id: Uuid) -> Result<Comment, CustomError> {
        self.comments
            .find(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Parent comment not found".to_string()))
    }

    async fn replies_sorted(&self, parent_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let mut replies = self.comments.replies_of(parent_id).await?;
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(replies)
    }

    async fn user_map(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>, CustomError> {
        Ok(self
            .identity
            .find_users(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    /// Attaches derived counts and authors to a flat comment listing.
    async fn decorate(
        &self,
        comments: Vec<Comment>,
        users: &HashMap<Uuid, User>,
    ) -> Result<Vec<CommentItem>, CustomError> {
        let ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
        let like_counts = self.likes.count_for_comments(&ids).await?;
        let reply_counts = self.comments.count_replies(&ids).await?;

        Ok(comments
            .into_iter()
            .map(|c| CommentItem {
                id: c.id,
                user: users.get(&c.user_id).cloned(),
                content: c.content,
                created_at: c.created_at,
                updated_at: c.updated_at,
                is_edited: c.is_edited,
                is_deleted: c.is_deleted,
                like_count: like_counts.get(&c.id).copied().unwrap_or(0),
                reply_count: reply_counts.get(&c.id).copied().unwrap_or(0),
                is_reply: c.parent_comment_id.is_some(),
            })
            .collect())
    }
}
