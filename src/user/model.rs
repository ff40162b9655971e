use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local mirror of a user owned by the login service. Provisioned lazily,
/// never updated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// External identifier assigned by the login service.
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ProvisionUserRequest {
    pub user_id: String,
    pub username: String,
    pub email: String,
}
