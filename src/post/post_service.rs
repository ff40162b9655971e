use crate::post::post_model::{Post, PostView};
use crate::store::{CommentLikeStore, CommentStore, IdentityStore, PostLikeStore};
use crate::utils::error::CustomError;
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

const MAX_DESCRIPTION_LENGTH: usize = 2000;

pub struct PostService {
    identity: Arc<dyn IdentityStore>,
    comments: Arc<dyn CommentStore>,
    comment_likes: Arc<dyn CommentLikeStore>,
    post_likes: Arc<dyn PostLikeStore>,
}

impl PostService {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        comments: Arc<dyn CommentStore>,
        comment_likes: Arc<dyn CommentLikeStore>,
        post_likes: Arc<dyn PostLikeStore>,
    ) -> Self {
        PostService {
            identity,
            comments,
            comment_likes,
            post_likes,
        }
    }

    fn validate_description(description: &str) -> Result<(), CustomError> {
        if description.trim().is_empty() {
            return Err(CustomError::ValidationError(
                "Post description cannot be empty".to_string(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(CustomError::ValidationError(format!(
                "Post description exceeds {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(())
    }

    /// Create a mirror post. The post number comes from the atomic sequence;
    /// the unique index on it turns any residual race into a retryable
    /// conflict instead of two posts sharing a number.
    pub async fn create_post(
        &self,
        user_id: String,
        description: String,
    ) -> Result<Post, CustomError> {
        if user_id.trim().is_empty() {
            return Err(CustomError::ValidationError(
                "user_id cannot be empty".to_string(),
            ));
        }
        Self::validate_description(&description)?;

        let post_number = self.identity.next_post_number().await?;
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            description,
            post_number,
            created_at: now,
            updated_at: now,
        };
        self.identity.insert_post(post).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostView, CustomError> {
        let post = self
            .identity
            .find_post(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".to_string()))?;
        let comment_count = self.comments.count_for_post(&id).await? as i64;
        Ok(PostView { post, comment_count })
    }

    /// All mirror posts, newest first, with their live comment counts.
    pub async fn list_posts(&self) -> Result<Vec<PostView>, CustomError> {
        let mut posts = self.identity.list_posts().await?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let comment_count = self.comments.count_for_post(&post.id).await? as i64;
            views.push(PostView { post, comment_count });
        }
        Ok(views)
    }

    pub async fn update_post(&self, id: Uuid, description: String) -> Result<Post, CustomError> {
        Self::validate_description(&description)?;
        self.identity
            .update_post_description(&id, &description, Utc::now())
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".to_string()))
    }

    /// Physically delete a post together with its comments and likes,
    /// mirroring the relational cascade. The steps are not transactional
    /// across collections.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), CustomError> {
        if self.identity.find_post(&id).await?.is_none() {
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }

        let removed_comments = self.comments.delete_by_post(&id).await?;
        self.comment_likes.delete_by_comments(&removed_comments).await?;
        let removed_likes = self.post_likes.delete_by_post(&id).await?;
        self.identity.delete_post(&id).await?;

        info!(
            "Deleted post {} with {} comments and {} likes",
            id,
            removed_comments.len(),
            removed_likes
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::user::model::User;
    use std::collections::HashSet;

    fn service(store: &Arc<MemoryStore>) -> Arc<PostService> {
        Arc::new(PostService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ))
    }

    #[tokio::test]
    async fn post_numbers_are_sequential() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);

        let first = service.create_post("ext-1".into(), "one".into()).await.unwrap();
        let second = service.create_post("ext-1".into(), "two".into()).await.unwrap();
        assert_eq!(first.post_number, 1);
        assert_eq!(second.post_number, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creation_never_reuses_a_post_number() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create_post("ext-1".into(), format!("post {}", i)).await
            }));
        }

        let mut numbers = HashSet::new();
        for handle in handles {
            let post = handle.await.unwrap().unwrap();
            assert!(numbers.insert(post.post_number), "duplicate post number");
        }
        assert_eq!(numbers.len(), 16);
    }

    #[tokio::test]
    async fn create_validates_owner_and_description() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);

        let err = service.create_post("  ".into(), "desc".into()).await.unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));

        let err = service.create_post("ext-1".into(), "".into()).await.unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));

        let err = service
            .create_post("ext-1".into(), "x".repeat(2001))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ValidationError(_)));
    }

    #[tokio::test]
    async fn update_rewrites_description_only() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);

        let post = service.create_post("ext-1".into(), "before".into()).await.unwrap();
        let updated = service.update_post(post.id, "after".into()).await.unwrap();
        assert_eq!(updated.description, "after");
        assert_eq!(updated.post_number, post.post_number);
        assert_eq!(updated.created_at, post.created_at);

        let err = service
            .update_post(Uuid::from_u128(404), "after".into())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn delete_cascades_to_comments_and_likes() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        store
            .insert_user(User {
                id: Uuid::from_u128(1),
                user_id: "ext-1".into(),
                username: "user1".into(),
                email: "user1@example.com".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let post = service.create_post("ext-1".into(), "doomed".into()).await.unwrap();

        let comment = crate::comment::model::Comment {
            id: Uuid::from_u128(100),
            post_id: post.id,
            user_id: Uuid::from_u128(1),
            parent_comment_id: None,
            content: "comment".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_edited: false,
            is_deleted: false,
        };
        CommentStore::insert(store.as_ref(), comment.clone()).await.unwrap();
        CommentLikeStore::insert(
            store.as_ref(),
            crate::comment_like::model::CommentLike {
                id: Uuid::from_u128(200),
                comment_id: comment.id,
                user_id: Uuid::from_u128(1),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        PostLikeStore::insert(
            store.as_ref(),
            crate::post_like::model::PostLike {
                id: Uuid::from_u128(300),
                post_id: post.id,
                user_id: Uuid::from_u128(1),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        service.delete_post(post.id).await.unwrap();

        assert!(store.find_post(&post.id).await.unwrap().is_none());
        assert!(CommentStore::find(store.as_ref(), &comment.id).await.unwrap().is_none());
        assert!(
            CommentLikeStore::for_comment(store.as_ref(), &comment.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            PostLikeStore::for_post(store.as_ref(), &post.id)
                .await
                .unwrap()
                .is_empty()
        );

        let err = service.delete_post(post.id).await.unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn get_post_reports_live_comment_count() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);
        let post = service.create_post("ext-1".into(), "post".into()).await.unwrap();

        for (id, deleted) in [(100u128, false), (101, false), (102, true)] {
            CommentStore::insert(
                store.as_ref(),
                crate::comment::model::Comment {
                    id: Uuid::from_u128(id),
                    post_id: post.id,
                    user_id: Uuid::from_u128(1),
                    parent_comment_id: None,
                    content: "c".into(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                    is_edited: false,
                    is_deleted: deleted,
                },
            )
            .await
            .unwrap();
        }

        let view = service.get_post(post.id).await.unwrap();
        assert_eq!(view.comment_count, 2);
    }
}
