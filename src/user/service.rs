use crate::store::IdentityStore;
use crate::user::model::User;
use crate::utils::error::CustomError;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    identity: Arc<dyn IdentityStore>,
}

impl UserService {
    pub fn new(identity: Arc<dyn IdentityStore>) -> Self {
        UserService { identity }
    }

    /// Provision a mirror row for a user owned by the login service.
    /// Mirror users are never updated or deleted afterwards.
    pub async fn provision_user(
        &self,
        user_id: String,
        username: String,
        email: String,
    ) -> Result<User, CustomError> {
        if user_id.trim().is_empty() || username.trim().is_empty() {
            return Err(CustomError::ValidationError(
                "user_id and username cannot be empty".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(CustomError::ValidationError(
                "A valid email address is required".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            user_id,
            username,
            email,
            created_at: Utc::now(),
        };
        self.identity.insert_user(user).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, CustomError> {
        self.identity
            .find_user(&id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("User not found".to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, CustomError> {
        let mut users = self.identity.list_users().await?;
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}
