use crate::post::post_model::Post;
use crate::post_like::model::{
    LikedPost, MostActiveLiker, MostLikedPost, PostLike, PostLikeAnalytics, PostLikeView,
};
use crate::store::{IdentityStore, PostLikeStore};
use crate::user::model::User;
use crate::utils::error::CustomError;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const TOP_N: i64 = 5;

pub struct PostLikeService {
    likes: Arc<dyn PostLikeStore>,
    identity: Arc<dyn IdentityStore>,
}

impl PostLikeService {
    pub fn new(likes: Arc<dyn PostLikeStore>, identity: Arc<dyn IdentityStore>) -> Self {
        PostLikeService { likes, identity }
    }

    async fn require_post(&self, post_id: &Uuid) -> Result<Post, CustomError> {
        self.identity
            .find_post(post_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".to_string()))
    }

    /// Register a like. Same contract as comment likes: the (post, user)
    /// pair is unique even under concurrent duplicates.
    pub async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<PostLike, CustomError> {
        if self.identity.find_post(&post_id).await?.is_none() {
            return Err(CustomError::ValidationError(
                "Post reference does not resolve".to_string(),
            ));
        }
        if self.identity.find_user(&user_id).await?.is_none() {
            return Err(CustomError::ValidationError(
                "User reference does not resolve".to_string(),
            ));
        }

        let like = PostLike {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        self.likes.insert(like).await
    }

    pub async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), CustomError> {
        if self.likes.remove(&post_id, &user_id).await? {
            Ok(())
        } else {
            Err(CustomError::NotFoundError("Like not found".to_string()))
        }
    }

    /// Likes on a post with resolved actors, newest first.
    pub async fn post_likes(
        &self,
        post_id: Uuid,
    ) -> Result<(Post, Vec<PostLikeView>), CustomError> {
        let post = self.require_post(&post_id).await?;

        let mut likes = self.likes.for_post(&post_id).await?;
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let users = self.user_map(likes.iter().map(|l| l.user_id)).await?;
        let views = likes
            .into_iter()
            .map(|l| PostLikeView {
                id: l.id,
                user: users.get(&l.user_id).cloned(),
                created_at: l.created_at,
            })
            .collect();
        Ok((post, views))
    }

    /// Live like count for a post plus the usernames that liked it.
    pub async fn like_count(&self, post_id: Uuid) -> Result<(Post, i64, Vec<String>), CustomError> {
        let post = self.require_post(&post_id).await?;
        let likes = self.likes.for_post(&post_id).await?;
        let users = self.user_map(likes.iter().map(|l| l.user_id)).await?;

        let liked_by: Vec<String> = likes
            .iter()
            .filter_map(|l| users.get(&l.user_id).map(|u| u.username.clone()))
            .collect();
        Ok((post, likes.len() as i64, liked_by))
    }

    /// Posts a user has liked, with liked-at timestamps, newest first.
    pub async fn user_likes(&self, user_id: Uuid) -> Result<(User, Vec<LikedPost>), CustomError> {
        let user = self
            .identity
            .find_user(&user_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("User not found".to_string()))?;

        let mut likes = self.likes.for_user(&user_id).await?;
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let post_ids: Vec<Uuid> = likes.iter().map(|l| l.post_id).collect();
        let posts: HashMap<Uuid, Post> = self
            .identity
            .find_posts(&post_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let liked_posts = likes
            .into_iter()
            .filter_map(|l| {
                posts.get(&l.post_id).map(|p| LikedPost {
                    post_id: p.id,
                    post_number: p.post_number,
                    post_description: p.description.clone(),
                    post_user_id: p.user_id.clone(),
                    liked_at: l.created_at,
                })
            })
            .collect();
        Ok((user, liked_posts))
    }

    /// Totals plus the most liked posts and most active likers. Ties rank
    /// by ascending identifier.
    pub async fn analytics(&self) -> Result<PostLikeAnalytics, CustomError> {
        let total_likes = self.likes.count_all().await?;
        let total_posts = self.identity.count_posts().await?;
        let total_users = self.identity.count_users().await?;

        let by_post = self.likes.count_by_post(TOP_N).await?;
        let by_user = self.likes.count_by_user(TOP_N).await?;

        let post_ids: Vec<Uuid> = by_post.iter().map(|(id, _)| *id).collect();
        let posts: HashMap<Uuid, Post> = self
            .identity
            .find_posts(&post_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let users = self.user_map(by_user.iter().map(|(id, _)| *id)).await?;

        Ok(PostLikeAnalytics {
            total_likes,
            total_posts,
            total_users,
            most_liked_posts: by_post
                .into_iter()
                .filter_map(|(id, count)| {
                    posts.get(&id).map(|p| MostLikedPost {
                        post_number: p.post_number,
                        description: p.description.clone(),
                        like_count: count,
                    })
                })
                .collect(),
            most_active_likers: by_user
                .into_iter()
                .filter_map(|(id, count)| {
                    users.get(&id).map(|u| MostActiveLiker {
                        username: u.username.clone(),
                        like_count: count,
                    })
                })
                .collect(),
        })
    }

    async fn user_map(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, User>, CustomError> {
        let mut ids: Vec<Uuid> = ids.collect();
        ids.sort();
        ids.dedup();
        Ok(self
            .identity
            .find_users(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::IdentityStore;

    fn user(n: u128) -> User {
        User {
            id: Uuid::from_u128(n),
            user_id: format!("ext-{}", n),
            username: format!("user{}", n),
            email: format!("user{}@example.com", n),
            created_at: Utc::now(),
        }
    }

    fn post(n: u128) -> Post {
        Post {
            id: Uuid::from_u128(n),
            user_id: format!("ext-{}", n),
            description: format!("post {}", n),
            post_number: n as u32,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn fixtures() -> (PostLikeService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.insert_user(user(1)).await.unwrap();
        store.insert_user(user(2)).await.unwrap();
        store.insert_post(post(10)).await.unwrap();
        store.insert_post(post(11)).await.unwrap();
        (PostLikeService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn double_like_conflicts() {
        let (service, _) = fixtures().await;
        service.add_like(Uuid::from_u128(10), Uuid::from_u128(1)).await.unwrap();
        let err = service
            .add_like(Uuid::from_u128(10), Uuid::from_u128(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::ConflictError(_)));
    }

    #[tokio::test]
    async fn like_count_reports_usernames() {
        let (service, _) = fixtures().await;
        service.add_like(Uuid::from_u128(10), Uuid::from_u128(1)).await.unwrap();
        service.add_like(Uuid::from_u128(10), Uuid::from_u128(2)).await.unwrap();

        let (post, count, mut liked_by) = service.like_count(Uuid::from_u128(10)).await.unwrap();
        assert_eq!(post.post_number, 10);
        assert_eq!(count, 2);
        liked_by.sort();
        assert_eq!(liked_by, vec!["user1".to_string(), "user2".to_string()]);
    }

    #[tokio::test]
    async fn remove_like_requires_an_existing_pair() {
        let (service, _) = fixtures().await;
        let err = service
            .remove_like(Uuid::from_u128(10), Uuid::from_u128(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));

        service.add_like(Uuid::from_u128(10), Uuid::from_u128(1)).await.unwrap();
        service.remove_like(Uuid::from_u128(10), Uuid::from_u128(1)).await.unwrap();
        let (_, count, _) = service.like_count(Uuid::from_u128(10)).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn user_likes_lists_liked_posts() {
        let (service, _) = fixtures().await;
        service.add_like(Uuid::from_u128(10), Uuid::from_u128(1)).await.unwrap();
        service.add_like(Uuid::from_u128(11), Uuid::from_u128(1)).await.unwrap();

        let (user, liked) = service.user_likes(Uuid::from_u128(1)).await.unwrap();
        assert_eq!(user.username, "user1");
        assert_eq!(liked.len(), 2);
        let mut numbers: Vec<u32> = liked.iter().map(|l| l.post_number).collect();
        numbers.sort();
        assert_eq!(numbers, vec![10, 11]);
    }

    #[tokio::test]
    async fn analytics_counts_and_ranks() {
        let (service, _) = fixtures().await;
        service.add_like(Uuid::from_u128(10), Uuid::from_u128(1)).await.unwrap();
        service.add_like(Uuid::from_u128(10), Uuid::from_u128(2)).await.unwrap();
        service.add_like(Uuid::from_u128(11), Uuid::from_u128(1)).await.unwrap();

        let analytics = service.analytics().await.unwrap();
        assert_eq!(analytics.total_likes, 3);
        assert_eq!(analytics.total_posts, 2);
        assert_eq!(analytics.total_users, 2);

        assert_eq!(analytics.most_liked_posts[0].post_number, 10);
        assert_eq!(analytics.most_liked_posts[0].like_count, 2);
        assert_eq!(analytics.most_liked_posts[1].like_count, 1);

        assert_eq!(analytics.most_active_likers[0].username, "user1");
        assert_eq!(analytics.most_active_likers[0].like_count, 2);
    }
}
