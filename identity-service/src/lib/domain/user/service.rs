use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialHasher;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for the user directory.
///
/// Owns the email uniqueness pre-check and the password hashing step; the
/// repository remains the final arbiter when two writes race on one email.
pub struct UserService<UR, H>
where
    UR: UserRepository,
    H: CredentialHasher,
{
    repository: Arc<UR>,
    hasher: Arc<H>,
}

impl<UR, H> UserService<UR, H>
where
    UR: UserRepository,
    H: CredentialHasher,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `hasher` - Password hashing implementation
    pub fn new(repository: Arc<UR>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }
}

#[async_trait]
impl<UR, H> UserServicePort for UserService<UR, H>
where
    UR: UserRepository,
    H: CredentialHasher,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        tracing::info!(email = %command.email, "Creating user");

        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::warn!(email = %command.email, "Email already exists");
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hasher.hash(&command.password)?;

        let new_user = NewUser {
            name: command.name,
            email: command.email,
            login: command.login,
            password_hash,
        };

        let created_user = self.repository.create(new_user).await?;
        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        let users = self.repository.list_all().await?;
        tracing::debug!(count = users.len(), "Fetched all users");

        Ok(users)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let user = self.repository.find_by_id(id).await?;
        tracing::debug!(user_id = %id, found = user.is_some(), "Fetched user");

        Ok(user)
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        tracing::info!(user_id = %id, "Updating user");

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if existing.email != command.email {
            if let Some(holder) = self.repository.find_by_email(&command.email).await? {
                if holder.id != existing.id {
                    tracing::warn!(
                        user_id = %id,
                        email = %command.email,
                        "Email already exists"
                    );
                    return Err(UserError::EmailAlreadyExists(command.email.to_string()));
                }
            }
        }

        let password_hash = self.hasher.hash(&command.password)?;

        let replacement = User {
            id: existing.id,
            name: existing.name,
            email: command.email,
            login: command.login,
            password_hash,
        };

        let updated_user = self.repository.update(replacement).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        tracing::info!(user_id = %id, "Deleting user");

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
