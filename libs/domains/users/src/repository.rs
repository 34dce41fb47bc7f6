use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{SYSTEM_ACTOR, User, audit_timestamp};

/// Repository trait for User persistence
///
/// Records are returned in storage order. Implementations report a missing id as
/// [`UserError::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user
    async fn get_all(&self) -> UserResult<Vec<User>>;

    /// Get the first user whose id matches
    async fn get_by_id(&self, id: Uuid) -> UserResult<User>;

    /// Append a user; the caller has already validated it
    async fn create(&self, user: User) -> UserResult<()>;

    /// Replace name and email, stamping `updated_at`/`updated_by`
    async fn update(&self, id: Uuid, name: String, email: String) -> UserResult<()>;

    /// Remove every user with the id
    async fn delete(&self, id: Uuid) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_all(&self) -> UserResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn create(&self, user: User) -> UserResult<()> {
        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        self.users.write().await.push(user);
        Ok(())
    }

    async fn update(&self, id: Uuid, name: String, email: String) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        user.name = name;
        user.email = email;
        user.metadata.touch(audit_timestamp(), SYSTEM_ACTOR);

        tracing::info!(user_id = %id, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}
