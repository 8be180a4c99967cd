use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::HasherError;
use crate::user::errors::UserError;

/// Port for user directory operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Name, email, login and plaintext password
    ///
    /// # Returns
    /// Persisted user with its storage-assigned id and password hash
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve every registered user, in storage order.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_all_users(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// `None` when no user has this id; absence is not an error here
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Replace email, login and password of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `Hashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Permanently delete an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations are the final arbiter of email uniqueness: a write that
/// would duplicate an email must fail with `EmailAlreadyExists`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and assign its id.
    ///
    /// # Returns
    /// Stored user including the assigned id
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Overwrite an existing user record.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered to another user
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}

/// One-way salted password hashing.
///
/// Hashing is CPU bound and blocking; implementations hold no mutable state.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password. Two calls with the same input return
    /// different digests.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    fn hash(&self, plaintext: &str) -> Result<String, HasherError>;

    /// Check a plaintext password against a stored digest.
    ///
    /// # Returns
    /// `false` on mismatch
    ///
    /// # Errors
    /// * `MalformedHash` - Digest is structurally corrupt
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HasherError>;
}
