pub mod password_hasher;
pub mod token_issuer;

pub use password_hasher::Argon2CredentialHasher;
pub use token_issuer::JwtTokenIssuer;
