use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Used when `database.backend = "memory"` and by the integration tests.
/// Ids start at 1 and are never reused. The uniqueness check and the write
/// happen under the same lock, so concurrent creates with one email cannot
/// both succeed.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

impl Store {
    fn email_taken_by_other(&self, email: &EmailAddress, id: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| &user.email == email && Some(user.id) != id)
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.email_taken_by_other(&user.email, None) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        state.last_id += 1;
        let user = user.with_id(UserId(state.last_id));
        state.users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, stored = state.users.len(), "User stored in memory");

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if state.email_taken_by_other(&user.email, Some(user.id)) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.state
            .write()
            .await
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}
