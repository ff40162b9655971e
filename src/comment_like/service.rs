use crate::comment_like::model::{CommentLike, CommentLikeView};
use crate::store::{CommentLikeStore, CommentStore, IdentityStore};
use crate::utils::error::CustomError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentLikeService {
    likes: Arc<dyn CommentLikeStore>,
    comments: Arc<dyn CommentStore>,
    identity: Arc<dyn IdentityStore>,
}

impl CommentLikeService {
    pub fn new(
        likes: Arc<dyn CommentLikeStore>,
        comments: Arc<dyn CommentStore>,
        identity: Arc<dyn IdentityStore>,
    ) -> Self {
        CommentLikeService {
            likes,
            comments,
            identity,
        }
    }

    /// Register a like. The (comment, user) pair is unique; a duplicate,
    /// concurrent or not, fails with a conflict.
    pub async fn add_like(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<CommentLike, CustomError> {
        if self.comments.find(&comment_id).await?.is_none() {
            return Err(CustomError::ValidationError(
                "Comment reference does not resolve".to_string(),
            ));
        }
        if self.identity.find_user(&user_id).await?.is_none() {
            return Err(CustomError::ValidationError(
                "User reference does not resolve".to_string(),
            ));
        }

        let like = CommentLike {
            id: Uuid::new_v4(),
            comment_id,
            user_id,
            created_at: Utc::now(),
        };
        self.likes.insert(like).await
    }

    /// Remove the (comment, user) like if it exists.
    pub async fn remove_like(&self, comment_id: Uuid, user_id: Uuid) -> Result<(), CustomError> {
        if self.likes.remove(&comment_id, &user_id).await? {
            Ok(())
        } else {
            Err(CustomError::NotFoundError("Like not found".to_string()))
        }
    }

    /// Live listing of a comment's likes with resolved actors, newest first.
    pub async fn comment_likes(
        &self,
        comment_id: Uuid,
    ) -> Result<Vec<CommentLikeView>, CustomError> {
        if self.comments.find(&comment_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Comment not found".to_string()));
        }

        let mut likes = self.likes.for_comment(&comment_id).await?;
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut user_ids: Vec<Uuid> = likes.iter().map(|l| l.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let users: HashMap<Uuid, _> = self
            .identity
            .find_users(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(likes
            .into_iter()
            .map(|l| CommentLikeView {
                id: l.id,
                user: users.get(&l.user_id).cloned(),
                created_at: l.created_at,
            })
            .collect())
    }
}
