//! MongoDB adapter for the storage ports. Unique indexes back every
//! uniqueness contract; duplicate-key writes (code 11000) surface as
//! `ConflictError` so races never produce duplicate rows.

use crate::comment::model::{Comment, CommentTotals};
use crate::comment_like::model::CommentLike;
use crate::post::post_model::Post;
use crate::post_like::model::PostLike;
use crate::store::{CommentLikeStore, CommentStore, IdentityStore, PostLikeStore};
use crate::user::model::User;
use crate::utils::error::CustomError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Sequence document backing post-number allocation.
#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    id: String,
    seq: u32,
}

pub struct MongoStore {
    users: Collection<User>,
    posts: Collection<Post>,
    counters: Collection<Counter>,
    comments: Collection<Comment>,
    comment_likes: Collection<CommentLike>,
    post_likes: Collection<PostLike>,
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}

fn group_id(doc: &Document) -> Option<Uuid> {
    doc.get_str("_id").ok().and_then(|s| Uuid::parse_str(s).ok())
}

fn group_count(doc: &Document) -> i64 {
    match doc.get("count") {
        Some(Bson::Int32(n)) => *n as i64,
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(f)) => *f as i64,
        _ => 0,
    }
}

fn id_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

impl MongoStore {
    pub fn new(client: &Client) -> Self {
        let db = client.database("interactions_db");
        MongoStore {
            users: db.collection::<User>("sample_users"),
            posts: db.collection::<Post>("sample_posts"),
            counters: db.collection::<Counter>("counters"),
            comments: db.collection::<Comment>("comments"),
            comment_likes: db.collection::<CommentLike>("comment_likes"),
            post_likes: db.collection::<PostLike>("post_likes"),
        }
    }

    /// Creates the unique indexes the engines rely on. Must run before the
    /// server starts accepting requests.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let unique = |keys: Document| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };
        let plain = |keys: Document| IndexModel::builder().keys(keys).build();

        let failed =
            |e: mongodb::error::Error| CustomError::InternalServerError(format!("Failed to create index: {}", e));

        for keys in [doc! {"user_id": 1}, doc! {"username": 1}, doc! {"email": 1}] {
            self.users.create_index(unique(keys)).await.map_err(failed)?;
        }
        self.posts
            .create_index(unique(doc! {"post_number": 1}))
            .await
            .map_err(failed)?;
        for keys in [
            doc! {"post_id": 1, "created_at": 1},
            doc! {"user_id": 1, "created_at": 1},
            doc! {"parent_comment_id": 1, "created_at": 1},
        ] {
            self.comments.create_index(plain(keys)).await.map_err(failed)?;
        }
        self.comment_likes
            .create_index(unique(doc! {"comment_id": 1, "user_id": 1}))
            .await
            .map_err(failed)?;
        self.post_likes
            .create_index(unique(doc! {"post_id": 1, "user_id": 1}))
            .await
            .map_err(failed)?;
        Ok(())
    }

    async fn grouped_counts(
        &self,
        group_field: &str,
        limit: i64,
    ) -> Result<Vec<(Uuid, i64)>, CustomError> {
        let pipeline = vec![
            doc! {"$match": {"is_deleted": false}},
            doc! {"$group": {"_id": format!("${}", group_field), "count": {"$sum": 1}}},
            doc! {"$sort": {"count": -1, "_id": 1}},
            doc! {"$limit": limit},
        ];
        let mut cursor = self.comments.aggregate(pipeline).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to aggregate comments: {}", e))
        })?;

        let mut out = Vec::new();
        while let Some(d) = cursor.try_next().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to read aggregation: {}", e))
        })? {
            if let Some(id) = group_id(&d) {
                out.push((id, group_count(&d)));
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl IdentityStore for MongoStore {
    async fn insert_user(&self, user: User) -> Result<User, CustomError> {
        self.users.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                CustomError::ConflictError(
                    "User with this user_id, username or email already exists".to_string(),
                )
            } else {
                CustomError::InternalServerError(format!("Failed to create user: {}", e))
            }
        })?;
        Ok(user)
    }

    async fn find_user(&self, id: &Uuid) -> Result<Option<User>, CustomError> {
        self.users
            .find_one(doc! {"_id": id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch user: {}", e)))
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, CustomError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .users
            .find(doc! {"_id": {"$in": id_strings(ids)}})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch users: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect users: {}", e)))
    }

    async fn list_users(&self) -> Result<Vec<User>, CustomError> {
        let cursor = self
            .users
            .find(doc! {})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch users: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect users: {}", e)))
    }

    async fn count_users(&self) -> Result<i64, CustomError> {
        let n = self
            .users
            .count_documents(doc! {})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to count users: {}", e)))?;
        Ok(n as i64)
    }

    async fn next_post_number(&self) -> Result<u32, CustomError> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! {"_id": "post_number"},
                doc! {"$inc": {"seq": 1}},
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to allocate post number: {}", e))
            })?;
        counter.map(|c| c.seq).ok_or_else(|| {
            CustomError::InternalServerError("Post number counter missing after upsert".to_string())
        })
    }

    async fn insert_post(&self, post: Post) -> Result<Post, CustomError> {
        self.posts.insert_one(&post).await.map_err(|e| {
            if is_duplicate_key(&e) {
                // The sequence counter makes this unreachable in practice;
                // surfaced as a retryable conflict rather than a fault.
                CustomError::ConflictError("Post number already taken, retry the request".to_string())
            } else {
                CustomError::InternalServerError(format!("Failed to create post: {}", e))
            }
        })?;
        Ok(post)
    }

    async fn find_post(&self, id: &Uuid) -> Result<Option<Post>, CustomError> {
        self.posts
            .find_one(doc! {"_id": id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch post: {}", e)))
    }

    async fn find_posts(&self, ids: &[Uuid]) -> Result<Vec<Post>, CustomError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .posts
            .find(doc! {"_id": {"$in": id_strings(ids)}})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch posts: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect posts: {}", e)))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .posts
            .find(doc! {})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch posts: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect posts: {}", e)))
    }

    async fn count_posts(&self) -> Result<i64, CustomError> {
        let n = self
            .posts
            .count_documents(doc! {})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to count posts: {}", e)))?;
        Ok(n as i64)
    }

    async fn update_post_description(
        &self,
        id: &Uuid,
        description: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, CustomError> {
        let Some(mut post) = self.find_post(id).await? else {
            return Ok(None);
        };
        post.description = description.to_string();
        post.updated_at = updated_at;
        self.posts
            .replace_one(doc! {"_id": id.to_string()}, &post)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to update post: {}", e)))?;
        Ok(Some(post))
    }

    async fn delete_post(&self, id: &Uuid) -> Result<bool, CustomError> {
        let result = self
            .posts
            .delete_one(doc! {"_id": id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to delete post: {}", e)))?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl CommentStore for MongoStore {
    async fn insert(&self, comment: Comment) -> Result<Comment, CustomError> {
        self.comments
            .insert_one(&comment)
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to add comment: {}", e)))?;
        Ok(comment)
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Comment>, CustomError> {
        self.comments
            .find_one(doc! {"_id": id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch comment: {}", e)))
    }

    async fn update(&self, comment: &Comment) -> Result<(), CustomError> {
        self.comments
            .replace_one(doc! {"_id": comment.id.to_string()}, comment)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update comment: {}", e))
            })?;
        Ok(())
    }

    async fn for_post(&self, post_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .comments
            .find(doc! {"post_id": post_id.to_string()})
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comments: {}", e))
            })?;
        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect comments: {}", e))
        })
    }

    async fn for_user(&self, user_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .comments
            .find(doc! {"user_id": user_id.to_string()})
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comments: {}", e))
            })?;
        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect comments: {}", e))
        })
    }

    async fn replies_of(&self, parent_id: &Uuid) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .comments
            .find(doc! {"parent_comment_id": parent_id.to_string()})
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch replies: {}", e))
            })?;
        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect replies: {}", e))
        })
    }

    async fn count_for_post(&self, post_id: &Uuid) -> Result<u64, CustomError> {
        self.comments
            .count_documents(doc! {"post_id": post_id.to_string(), "is_deleted": false})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to count comments: {}", e)))
    }

    async fn count_replies(
        &self,
        parent_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, CustomError> {
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let pipeline = vec![
            doc! {"$match": {
                "parent_comment_id": {"$in": id_strings(parent_ids)},
                "is_deleted": false,
            }},
            doc! {"$group": {"_id": "$parent_comment_id", "count": {"$sum": 1}}},
        ];
        let mut cursor = self.comments.aggregate(pipeline).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to count replies: {}", e))
        })?;
        let mut out = HashMap::new();
        while let Some(d) = cursor.try_next().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to read reply counts: {}", e))
        })? {
            if let Some(id) = group_id(&d) {
                out.insert(id, group_count(&d));
            }
        }
        Ok(out)
    }

    async fn totals(&self) -> Result<CommentTotals, CustomError> {
        let count = |filter: Document| async move {
            self.comments.count_documents(filter).await.map_err(|e| {
                CustomError::InternalServerError(format!("Failed to count comments: {}", e))
            })
        };
        let total_comments = count(doc! {"is_deleted": false}).await? as i64;
        let total_replies =
            count(doc! {"is_deleted": false, "parent_comment_id": {"$ne": null}}).await? as i64;
        let total_top_level =
            count(doc! {"is_deleted": false, "parent_comment_id": null}).await? as i64;
        Ok(CommentTotals {
            total_comments,
            total_replies,
            total_top_level,
        })
    }

    async fn count_by_post(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        self.grouped_counts("post_id", limit).await
    }

    async fn count_by_user(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        self.grouped_counts("user_id", limit).await
    }

    async fn delete_by_post(&self, post_id: &Uuid) -> Result<Vec<Uuid>, CustomError> {
        let removed: Vec<Uuid> = CommentStore::for_post(self, post_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        self.comments
            .delete_many(doc! {"post_id": post_id.to_string()})
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete comments: {}", e))
            })?;
        Ok(removed)
    }
}

#[async_trait]
impl CommentLikeStore for MongoStore {
    async fn insert(&self, like: CommentLike) -> Result<CommentLike, CustomError> {
        let already_liked =
            || CustomError::ConflictError("User already liked this comment".to_string());

        let existing = self
            .comment_likes
            .find_one(doc! {
                "comment_id": like.comment_id.to_string(),
                "user_id": like.user_id.to_string(),
            })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to check like: {}", e)))?;
        if existing.is_some() {
            return Err(already_liked());
        }

        // The unique index catches the concurrent twin of this request.
        self.comment_likes.insert_one(&like).await.map_err(|e| {
            if is_duplicate_key(&e) {
                already_liked()
            } else {
                CustomError::InternalServerError(format!("Failed to add like: {}", e))
            }
        })?;
        Ok(like)
    }

    async fn remove(&self, comment_id: &Uuid, user_id: &Uuid) -> Result<bool, CustomError> {
        let result = self
            .comment_likes
            .delete_one(doc! {
                "comment_id": comment_id.to_string(),
                "user_id": user_id.to_string(),
            })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to remove like: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn for_comment(&self, comment_id: &Uuid) -> Result<Vec<CommentLike>, CustomError> {
        let cursor = self
            .comment_likes
            .find(doc! {"comment_id": comment_id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch likes: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect likes: {}", e)))
    }

    async fn count_for_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, i64>, CustomError> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let pipeline = vec![
            doc! {"$match": {"comment_id": {"$in": id_strings(comment_ids)}}},
            doc! {"$group": {"_id": "$comment_id", "count": {"$sum": 1}}},
        ];
        let mut cursor = self.comment_likes.aggregate(pipeline).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to count likes: {}", e))
        })?;
        let mut out = HashMap::new();
        while let Some(d) = cursor.try_next().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to read like counts: {}", e))
        })? {
            if let Some(id) = group_id(&d) {
                out.insert(id, group_count(&d));
            }
        }
        Ok(out)
    }

    async fn delete_by_comments(&self, comment_ids: &[Uuid]) -> Result<u64, CustomError> {
        if comment_ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .comment_likes
            .delete_many(doc! {"comment_id": {"$in": id_strings(comment_ids)}})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to delete likes: {}", e)))?;
        Ok(result.deleted_count)
    }
}

#[async_trait]
impl PostLikeStore for MongoStore {
    async fn insert(&self, like: PostLike) -> Result<PostLike, CustomError> {
        let already_liked =
            || CustomError::ConflictError("User has already liked this post".to_string());

        let existing = self
            .post_likes
            .find_one(doc! {
                "post_id": like.post_id.to_string(),
                "user_id": like.user_id.to_string(),
            })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to check like: {}", e)))?;
        if existing.is_some() {
            return Err(already_liked());
        }

        self.post_likes.insert_one(&like).await.map_err(|e| {
            if is_duplicate_key(&e) {
                already_liked()
            } else {
                CustomError::InternalServerError(format!("Failed to add like: {}", e))
            }
        })?;
        Ok(like)
    }

    async fn remove(&self, post_id: &Uuid, user_id: &Uuid) -> Result<bool, CustomError> {
        let result = self
            .post_likes
            .delete_one(doc! {
                "post_id": post_id.to_string(),
                "user_id": user_id.to_string(),
            })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to remove like: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn for_post(&self, post_id: &Uuid) -> Result<Vec<PostLike>, CustomError> {
        let cursor = self
            .post_likes
            .find(doc! {"post_id": post_id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch likes: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect likes: {}", e)))
    }

    async fn for_user(&self, user_id: &Uuid) -> Result<Vec<PostLike>, CustomError> {
        let cursor = self
            .post_likes
            .find(doc! {"user_id": user_id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch likes: {}", e)))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to collect likes: {}", e)))
    }

    async fn count_all(&self) -> Result<i64, CustomError> {
        let n = self
            .post_likes
            .count_documents(doc! {})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to count likes: {}", e)))?;
        Ok(n as i64)
    }

    async fn count_by_post(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        self.like_ranking("post_id", limit).await
    }

    async fn count_by_user(&self, limit: i64) -> Result<Vec<(Uuid, i64)>, CustomError> {
        self.like_ranking("user_id", limit).await
    }

    async fn delete_by_post(&self, post_id: &Uuid) -> Result<u64, CustomError> {
        let result = self
            .post_likes
            .delete_many(doc! {"post_id": post_id.to_string()})
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to delete likes: {}", e)))?;
        Ok(result.deleted_count)
    }
}

impl MongoStore {
    async fn like_ranking(
        &self,
        group_field: &str,
        limit: i64,
    ) -> Result<Vec<(Uuid, i64)>, CustomError> {
        let pipeline = vec![
            doc! {"$group": {"_id": format!("${}", group_field), "count": {"$sum": 1}}},
            doc! {"$sort": {"count": -1, "_id": 1}},
            doc! {"$limit": limit},
        ];
        let mut cursor = self.post_likes.aggregate(pipeline).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to aggregate likes: {}", e))
        })?;
        let mut out = Vec::new();
        while let Some(d) = cursor.try_next().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to read like ranking: {}", e))
        })? {
            if let Some(id) = group_id(&d) {
                out.push((id, group_count(&d)));
            }
        }
        Ok(out)
    }
}
