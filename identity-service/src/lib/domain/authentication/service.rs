use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::AuthToken;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::authentication::ports::TokenIssuer;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::user::errors::HasherError;
use crate::user::ports::CredentialHasher;
use crate::user::ports::UserRepository;

/// Plaintext behind the digest verified when a login names an unknown email.
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder";

/// Domain service for login and password changes.
pub struct AuthService<UR, H, TI>
where
    UR: UserRepository,
    H: CredentialHasher,
    TI: TokenIssuer,
{
    repository: Arc<UR>,
    hasher: Arc<H>,
    token_issuer: Arc<TI>,
    unknown_user_digest: OnceLock<String>,
}

impl<UR, H, TI> AuthService<UR, H, TI>
where
    UR: UserRepository,
    H: CredentialHasher,
    TI: TokenIssuer,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `hasher` - Password hashing implementation
    /// * `token_issuer` - Access token signing implementation
    pub fn new(repository: Arc<UR>, hasher: Arc<H>, token_issuer: Arc<TI>) -> Self {
        Self {
            repository,
            hasher,
            token_issuer,
            unknown_user_digest: OnceLock::new(),
        }
    }

    /// Verify `password` against a placeholder digest made with the configured cost.
    fn verify_against_unknown_user(&self, password: &str) {
        let digest = match self.unknown_user_digest.get() {
            Some(digest) => digest,
            None => match self.hasher.hash(UNKNOWN_USER_PASSWORD) {
                Ok(digest) => self.unknown_user_digest.get_or_init(|| digest),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to prepare unknown-user digest");
                    return;
                }
            },
        };

        let _ = self.hasher.verify(password, digest);
    }
}

#[async_trait]
impl<UR, H, TI> AuthServicePort for AuthService<UR, H, TI>
where
    UR: UserRepository,
    H: CredentialHasher,
    TI: TokenIssuer,
{
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<AuthToken, AuthError> {
        tracing::info!(email = %email, "Attempting login");

        let Some(user) = self.repository.find_by_email(email).await? else {
            self.verify_against_unknown_user(password);
            tracing::warn!(email = %email, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        match self.hasher.verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(email = %email, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(HasherError::MalformedHash(detail)) => {
                tracing::warn!(
                    user_id = %user.id,
                    error = %detail,
                    "Stored password hash is malformed"
                );
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        }

        let token = self.token_issuer.issue(&user, Utc::now())?;
        tracing::info!(user_id = %user.id, "Login successful");

        Ok(token)
    }

    async fn update_password(
        &self,
        email: &EmailAddress,
        new_password: &str,
    ) -> Result<(), AuthError> {
        tracing::info!(email = %email, "Updating password");

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        let password_hash = self.hasher.hash(new_password)?;

        let replacement = User {
            password_hash,
            ..user
        };

        self.repository.update(replacement).await?;
        tracing::info!(email = %email, "Password updated");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::domain::authentication::errors::TokenError;
    use crate::domain::user::models::Login;
    use crate::domain::user::models::NewUser;
    use crate::domain::user::models::UserId;
    use crate::user::errors::UserError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestHasher {}

        impl CredentialHasher for TestHasher {
            fn hash(&self, plaintext: &str) -> Result<String, HasherError>;
            fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HasherError>;
        }
    }

    mock! {
        pub TestTokenIssuer {}

        impl TokenIssuer for TestTokenIssuer {
            fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AuthToken, TokenError>;
        }
    }

    fn stored_user() -> User {
        User {
            id: UserId(1),
            name: "Ana".to_string(),
            email: EmailAddress::new("ana@x.com"),
            login: Login::new("ana1"),
            password_hash: "$argon2id$stored".to_string(),
        }
    }

    fn repository_with_ana() -> MockTestUserRepository {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "ana@x.com")
            .returning(|_| Ok(Some(stored_user())));
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() != "ana@x.com")
            .returning(|_| Ok(None));
        repository
    }

    /// Hasher that accepts only "secret123" against the stored digest.
    fn verifying_secret() -> MockTestHasher {
        let mut hasher = MockTestHasher::new();
        hasher
            .expect_verify()
            .withf(|_, digest| digest == "$argon2id$stored")
            .returning(|plaintext, _| Ok(plaintext == "secret123"));
        hasher
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut token_issuer = MockTestTokenIssuer::new();
        token_issuer
            .expect_issue()
            .withf(|user, now| {
                user.id == UserId(1) && (Utc::now() - *now).num_seconds().abs() < 5
            })
            .times(1)
            .returning(|_, _| Ok(AuthToken::new("header.claims.signature".to_string())));

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(verifying_secret()),
            Arc::new(token_issuer),
        );

        let token = service
            .login(&EmailAddress::new("ana@x.com"), "secret123")
            .await
            .unwrap();
        assert_eq!(token.access_token, "header.claims.signature");
        assert_eq!(token.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut token_issuer = MockTestTokenIssuer::new();
        token_issuer.expect_issue().times(0);

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(verifying_secret()),
            Arc::new(token_issuer),
        );

        let result = service
            .login(&EmailAddress::new("ana@x.com"), "wrong")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_matches_wrong_password() {
        let mut hasher = MockTestHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok("$argon2id$unknown".to_string()));
        hasher
            .expect_verify()
            .withf(|plaintext, digest| plaintext == "secret123" && digest == "$argon2id$unknown")
            .times(1)
            .returning(|_, _| Ok(false));
        let mut token_issuer = MockTestTokenIssuer::new();
        token_issuer.expect_issue().times(0);

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(hasher),
            Arc::new(token_issuer),
        );

        let unknown = service
            .login(&EmailAddress::new("nobody@x.com"), "secret123")
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), AuthError::InvalidCredentials.to_string());
    }

    #[tokio::test]
    async fn test_unknown_user_digest_is_prepared_once() {
        let mut hasher = MockTestHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok("$argon2id$unknown".to_string()));
        hasher.expect_verify().times(2).returning(|_, _| Ok(false));

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(hasher),
            Arc::new(MockTestTokenIssuer::new()),
        );

        for email in ["bob@x.com", "eve@x.com"] {
            let result = service.login(&EmailAddress::new(email), "secret123").await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_login_corrupt_hash_is_invalid_credentials() {
        let mut hasher = MockTestHasher::new();
        hasher
            .expect_verify()
            .returning(|_, _| Err(HasherError::MalformedHash("bad".to_string())));
        let mut token_issuer = MockTestTokenIssuer::new();
        token_issuer.expect_issue().times(0);

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(hasher),
            Arc::new(token_issuer),
        );

        let result = service
            .login(&EmailAddress::new("ana@x.com"), "secret123")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_hashing_failure_is_reported() {
        let mut hasher = MockTestHasher::new();
        hasher
            .expect_verify()
            .returning(|_, _| Err(HasherError::HashingFailed("out of memory".to_string())));

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(hasher),
            Arc::new(MockTestTokenIssuer::new()),
        );

        let result = service
            .login(&EmailAddress::new("ana@x.com"), "secret123")
            .await;
        assert!(matches!(result, Err(AuthError::Hashing(_))));
    }

    #[tokio::test]
    async fn test_login_signing_failure_propagates() {
        let mut token_issuer = MockTestTokenIssuer::new();
        token_issuer
            .expect_issue()
            .times(1)
            .returning(|_, _| Err(TokenError::SigningFailed("no key".to_string())));

        let service = AuthService::new(
            Arc::new(repository_with_ana()),
            Arc::new(verifying_secret()),
            Arc::new(token_issuer),
        );

        let result = service
            .login(&EmailAddress::new("ana@x.com"), "secret123")
            .await;
        assert!(matches!(result, Err(AuthError::Token(_))));
    }

    #[tokio::test]
    async fn test_login_storage_failure_is_internal() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(MockTestHasher::new()),
            Arc::new(MockTestTokenIssuer::new()),
        );

        let result = service
            .login(&EmailAddress::new("ana@x.com"), "secret123")
            .await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[tokio::test]
    async fn test_update_password_success() {
        let mut repository = repository_with_ana();
        repository
            .expect_update()
            .withf(|user| {
                user.id == UserId(1)
                    && user.email.as_str() == "ana@x.com"
                    && user.login.as_str() == "ana1"
                    && user.password_hash == "$argon2id$fresh"
            })
            .times(1)
            .returning(|user| Ok(user));

        let mut hasher = MockTestHasher::new();
        hasher
            .expect_hash()
            .withf(|plaintext| plaintext == "newpass1")
            .times(1)
            .returning(|_| Ok("$argon2id$fresh".to_string()));

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(hasher),
            Arc::new(MockTestTokenIssuer::new()),
        );

        let result = service
            .update_password(&EmailAddress::new("ana@x.com"), "newpass1")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_password_unknown_email() {
        let mut repository = repository_with_ana();
        repository.expect_update().times(0);
        let mut hasher = MockTestHasher::new();
        hasher.expect_hash().times(0);

        let service = AuthService::new(
            Arc::new(repository),
            Arc::new(hasher),
            Arc::new(MockTestTokenIssuer::new()),
        );

        let result = service
            .update_password(&EmailAddress::new("nobody@x.com"), "newpass1")
            .await;
        assert!(matches!(result, Err(AuthError::NotFound(ref email)) if email == "nobody@x.com"));
    }
}
