//! In-memory implementation of the storage ports, used by tests. A single
//! mutex guards all tables, so every check-then-insert runs as one atomic
//! step, matching the unique-index guarantees of the MongoDB adapter.

use crate::comment::model::{Comment, CommentTotals};
use crate::comment_like::model::CommentLike;
use crate::post::post_model::Post;
use crate::post_like::model::PostLike;
use crate::store::{CommentLikeStore, CommentStore, IdentityStore, PostLikeStore};
use crate::user::model::User;
use crate::utils::error::CustomError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    post_number_seq: u32,
    comments: Vec<Comment>,
    comment_likes: Vec<CommentLike>,
    post_likes: Vec<PostLike>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ranked(mut counts: HashMap<Uuid, i64>, limit: i64) -> Vec<(Uuid, i64)> {
    let mut out: Vec<(Uuid, i64)> = counts.drain().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    out.truncate(limit.max(0) as usize);
    out
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, CustomError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| {
            u.user_id == user.user_id || u.username == user.username || u.email == user.email
        }) {
            return Err(CustomError::ConflictError(
                "User with this user_id, username or email already exists".to_string(),
            ));
        }
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: &Uuid) -> Result<Option<User>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, CustomError> {
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn count_users(&self) -> Result<i64, CustomError> {
        Ok(self.tables.lock().unwrap().users.len() as i64)
    }

    async fn next_post_number(&self) -> Result<u32, CustomError> {
        let mut t = self.tables.lock().unwrap();
        t.post_number_seq += 1;
        Ok(t.post_number_seq)
    }

    async fn insert_post(&self, post: Post) -> Result<Post, CustomError> {
        let mut t = self.tables.lock().unwrap();
        if t.posts.iter().any(|p| p.post_number == post.post_number) {
            return Err(CustomError::ConflictError(
                "Post number already taken, retry the request".to_string(),
            ));
        }
        t.posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: &Uuid) -> Result<Option<Post>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.posts.iter().find(|p| p.id == *id).cloned())
    }

    async fn find_posts(&self, ids: &[Uuid]) -> Result<Vec<Post>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.posts.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, CustomError> {
        Ok(self.tables.lock().unwrap().posts.clone())
    }

    async fn count_posts(&self) -> Result<i64, CustomError> {
        Ok(self.tables.lock().unwrap().posts.len() as i64)
    }

    async fn update_post_description(
        &self,
        id: &Uuid,
        description: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, CustomError> {
        let mut t = self.tables.lock().unwrap();
        match t.posts.iter_mut().find(|p| p.id == *id) {
            Some(post) => {
                post.description = description.to_string();
                post.updated_at = updated_at;
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: &Uuid) -> Result<bool, CustomError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.posts.len();
        t.posts.retain(|p| p.id != *id);
        Ok(t.posts.len() < before)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError> {
        let mut t = self.tables.lock().unwrap();
        t.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Comment>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments.iter().find(|c| c.id == *id).cloned())
    }

    async fn update(&self, comment: &Comment) -> Result<(), CustomError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(existing) = t.comments.iter_mut().find(|c| c.id == comment.id) {
            *existing = comment.clone();
        }
        Ok(())
    }

    async fn for_post(&self, post_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments.iter().filter(|c| c.post_id == *post_id).cloned().collect())
    }

    async fn for_user(&self, user_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments.iter().filter(|c| c.user_id == *user_id).cloned().collect())
    }

    async fn replies_of(&self, parent_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments
            .iter()
            .filter(|c| c.parent_comment_id == Some(*parent_id))
            .cloned()
            .collect())
    }

    async fn count_for_post(&self, post_id: &Uuid) -> Result<u64, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments
            .iter()
            .filter(|c| c.post_id == *post_id && !c.is_deleted)
            .count() as u64)
    }

    async fn count_replies(
        &self,
        parent_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, CustomError> {
        let t = self.tables.lock().unwrap();
        let mut out = HashMap::new();
        for c in t.comments.iter().filter(|c| !c.is_deleted) {
            if let Some(parent) = c.parent_comment_id {
                if parent_ids.contains(&parent) {
                    *out.entry(parent).or_insert(0) += 1;
                }
            }
        }
        Ok(out)
    }

    async fn totals(&self) -> Result<CommentTotals, CustomError> {
        let t = self.tables.lock().unwrap();
        let live = || t.comments.iter().filter(|c| !c.is_deleted);
        let total_comments = live().count() as i64;
        let total_replies = live().filter(|c| c.parent_comment_id.is_some()).count() as i64;
        Ok(CommentTotals {
            total_comments,
            total_replies,
            total_top_level: total_comments - total_replies,
        })
    }

    async fn count_by_post(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        let t = self.tables.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for c in t.comments.iter().filter(|c| !c.is_deleted) {
            *counts.entry(c.post_id).or_insert(0) += 1;
        }
        Ok(ranked(counts, limit))
    }

    async fn count_by_user(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        let t = self.tables.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for c in t.comments.iter().filter(|c| !c.is_deleted) {
            *counts.entry(c.user_id).or_insert(0) += 1;
        }
        Ok(ranked(counts, limit))
    }

    async fn delete_by_post(&self, post_id: &Uuid) -> Result<Vec<Uuid>, CustomError> {
        let mut t = self.tables.lock().unwrap();
        let removed: Vec<Uuid> = t
            .comments
            .iter()
            .filter(|c| c.post_id == *post_id)
            .map(|c| c.id)
            .collect();
        t.comments.retain(|c| c.post_id != *post_id);
        Ok(removed)
    }
}

#[async_trait]
impl CommentLikeStore for MemoryStore {
    async fn insert(&self, like: CommentLike) -> Result<CommentLike, CustomError> {
        let mut t = self.tables.lock().unwrap();
        if t.comment_likes
            .iter()
            .any(|l| l.comment_id == like.comment_id && l.user_id == like.user_id)
        {
            return Err(CustomError::ConflictError(
                "User already liked this comment".to_string(),
            ));
        }
        t.comment_likes.push(like.clone());
        Ok(like)
    }

    async fn remove(&self, comment_id: &Uuid, user_id: &Uuid) -> Result<bool, CustomError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.comment_likes.len();
        t.comment_likes
            .retain(|l| !(l.comment_id == *comment_id && l.user_id == *user_id));
        Ok(t.comment_likes.len() < before)
    }

    async fn for_comment(&self, comment_id: &Uuid) -> Result<Vec<CommentLike>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comment_likes
            .iter()
            .filter(|l| l.comment_id == *comment_id)
            .cloned()
            .collect())
    }

    async fn count_for_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, CustomError> {
        let t = self.tables.lock().unwrap();
        let mut out = HashMap::new();
        for l in t.comment_likes.iter() {
            if comment_ids.contains(&l.comment_id) {
                *out.entry(l.comment_id).or_insert(0) += 1;
            }
        }
        Ok(out)
    }

    async fn delete_by_comments(&self, comment_ids: &[Uuid]) -> Result<u64, CustomError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.comment_likes.len();
        t.comment_likes.retain(|l| !comment_ids.contains(&l.comment_id));
        Ok((before - t.comment_likes.len()) as u64)
    }
}

#[async_trait]
impl PostLikeStore for MemoryStore {
    async fn insert(&self, like: PostLike) -> Result<PostLike, CustomError> {
        let mut t = self.tables.lock().unwrap();
        if t.post_likes
            .iter()
            .any(|l| l.post_id == like.post_id && l.user_id == like.user_id)
        {
            return Err(CustomError::ConflictError(
                "User has already liked this post".to_string(),
            ));
        }
        t.post_likes.push(like.clone());
        Ok(like)
    }

    async fn remove(&self, post_id: &Uuid, user_id: &Uuid) -> Result<bool, CustomError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.post_likes.len();
        t.post_likes
            .retain(|l| !(l.post_id == *post_id && l.user_id == *user_id));
        Ok(t.post_likes.len() < before)
    }

    async fn for_post(&self, post_id: &Uuid) -> Result<Vec<PostLike>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.post_likes.iter().filter(|l| l.post_id == *post_id).cloned().collect())
    }

    async fn for_user(&self, user_id: &Uuid) -> Result<Vec<PostLike>, CustomError> {
        let t = self.tables.lock().unwrap();
        Ok(t.post_likes.iter().filter(|l| l.user_id == *user_id).cloned().collect())
    }

    async fn count_all(&self) -> Result<i64, CustomError> {
        Ok(self.tables.lock().unwrap().post_likes.len() as i64)
    }

    async fn count_by_post(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        let t = self.tables.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for l in t.post_likes.iter() {
            *counts.entry(l.post_id).or_insert(0) += 1;
        }
        Ok(ranked(counts, limit))
    }

    async fn count_by_user(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        let t = self.tables.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for l in t.post_likes.iter() {
            *counts.entry(l.user_id).or_insert(0) += 1;
        }
        Ok(ranked(counts, limit))
    }

    async fn delete_by_post(&self, post_id: &Uuid) -> Result<u64, CustomError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.post_likes.len();
        t.post_likes.retain(|l| l.post_id != *post_id);
        Ok((before - t.post_likes.len()) as u64)
    }
}
