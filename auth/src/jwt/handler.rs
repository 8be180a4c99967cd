use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type so services define their own token payload.
/// Signs with HS256 when built from a shared secret and RS256 when built from
/// an RSA key pair. Decoding always requires an `exp` claim.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
}

impl JwtHandler {
    /// Create an HS256 handler from a shared secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: None,
        }
    }

    /// Create an RS256 handler from PEM encoded RSA keys.
    ///
    /// # Arguments
    /// * `private_pem` - PKCS#1 or PKCS#8 private key used for signing
    /// * `public_pem` - PKCS#1 or SPKI public key used for validation
    ///
    /// # Errors
    /// * `InvalidKey` - Either key could not be parsed
    pub fn from_rsa_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, JwtError> {
        let encoding_key =
            EncodingKey::from_rsa_pem(private_pem).map_err(|e| JwtError::InvalidKey(e.to_string()))?;
        let decoding_key =
            DecodingKey::from_rsa_pem(public_pem).map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::RS256,
            issuer: None,
        })
    }

    /// Require decoded tokens to carry this `iss` claim.
    pub fn with_issuer(mut self, issuer: impl ToString) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Signing algorithm in use.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encode claims into a compact JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT.
    ///
    /// Checks the signature, the `exp` claim and, when configured, the issuer.
    ///
    /// # Errors
    /// * `TokenExpired` - Token `exp` lies in the past
    /// * `DecodingFailed` - Token is malformed, badly signed or fails validation
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
