use std::fmt;
use std::str::FromStr;

use crate::user::errors::EmailError;
use crate::user::errors::LoginError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Always carries a storage-assigned id and a password hash; the plaintext
/// password never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub login: Login,
    pub password_hash: String,
}

/// User record that has not been persisted yet.
///
/// The repository assigns the id when it stores this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: EmailAddress,
    pub login: Login,
    pub password_hash: String,
}

impl NewUser {
    /// Attach the id assigned by storage.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            login: self.login,
            password_hash: self.password_hash,
        }
    }
}

/// User unique identifier, assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a base-10 integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        i64::from_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(format!("{s:?}: {e}")))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Compared exactly as given; no case folding or trimming is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Wrap an email that is already trusted (loaded from storage, or
    /// validated at the boundary).
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Validate a raw email address.
    ///
    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `InvalidFormat` - Does not conform to RFC 5322
    pub fn parse(email: String) -> Result<Self, EmailError> {
        if email.trim().is_empty() {
            return Err(EmailError::Blank);
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| Self(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Secondary user handle. Not unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login(String);

impl Login {
    const MIN_LENGTH: usize = 5;
    const MAX_LENGTH: usize = 20;

    /// Wrap a login that is already trusted.
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    /// Validate a raw login handle (5 to 20 characters).
    ///
    /// # Errors
    /// * `InvalidLength` - Length outside the accepted range
    pub fn parse(login: String) -> Result<Self, LoginError> {
        let length = login.chars().count();
        if (Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            Ok(Self(login))
        } else {
            Err(LoginError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            })
        }
    }

    /// Get login as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validate a display name.
///
/// # Errors
/// * `Blank` - Empty or whitespace only
pub fn parse_name(name: String) -> Result<String, NameError> {
    if name.trim().is_empty() {
        Err(NameError::Blank)
    } else {
        Ok(name)
    }
}

/// Validate a plaintext password against the registration policy
/// (8 to 100 characters).
///
/// # Errors
/// * `Blank` - Empty or whitespace only
/// * `InvalidLength` - Length outside the accepted range
pub fn parse_password(password: String) -> Result<String, PasswordPolicyError> {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 100;

    if password.trim().is_empty() {
        return Err(PasswordPolicyError::Blank);
    }

    let length = password.chars().count();
    if (MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        Ok(password)
    } else {
        Err(PasswordPolicyError::InvalidLength {
            min: MIN_LENGTH,
            max: MAX_LENGTH,
            actual: length,
        })
    }
}

/// Command to register a new user.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: EmailAddress,
    pub login: Login,
    pub password: String,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `email` - Email address, must be unique across users
    /// * `login` - Secondary handle
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(name: String, email: EmailAddress, login: Login, password: String) -> Self {
        Self {
            name,
            email,
            login,
            password,
        }
    }
}

/// Command to update an existing user.
///
/// Every field is applied. The password is always re-hashed and replaces the
/// stored hash; there is no "keep current password" form.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub email: EmailAddress,
    pub login: Login,
    pub password: String,
}

impl UpdateUserCommand {
    pub fn new(email: EmailAddress, login: Login, password: String) -> Self {
        Self {
            email,
            login,
            password,
        }
    }
}
