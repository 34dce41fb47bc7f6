use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, validate_email, validate_name};
use crate::repository::UserRepository;

/// Service layer for User business logic
///
/// Creates, updates and deletes are serialized through one gate, so the email uniqueness
/// check and the write that follows it cannot interleave with another write.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    write_gate: Arc<Mutex<()>>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create a new user after validation and an email uniqueness check
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        validate_name(&input.name)?;
        validate_email(&input.email)?;

        let _gate = self.write_gate.lock().await;

        let existing = self.repository.get_all().await?;
        if existing.iter().any(|u| u.email == input.email) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User::new(input.name, input.email);
        self.repository.create(user.clone()).await?;
        Ok(user)
    }

    /// List all users in storage order
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.get_all().await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        let id = parse_id(id)?;
        self.repository.get_by_id(id).await
    }

    /// Replace a user's name and email
    ///
    /// Any metadata in the input is ignored; the repository stamps the update itself.
    /// The new email is not checked against other users.
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<()> {
        validate_name(&input.name)?;
        validate_email(&input.email)?;
        let id = parse_id(id)?;

        let _gate = self.write_gate.lock().await;

        let existing = self.repository.get_by_id(id).await?;
        self.repository
            .update(existing.id, input.name, input.email)
            .await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        let id = parse_id(id)?;

        let _gate = self.write_gate.lock().await;
        self.repository.delete(id).await
    }
}

/// Empty ids are bad input; anything that is not a UUID cannot name a stored user.
fn parse_id(raw: &str) -> UserResult<Uuid> {
    if raw.is_empty() {
        return Err(UserError::InvalidInput("id cannot be empty".to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| UserError::NotFound(raw.to_string()))
}
