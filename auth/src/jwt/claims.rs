use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Generic JWT claims structure.
///
/// Supports the registered RFC 7519 claims plus custom fields via the `extra`
/// map, which is flattened into the token payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a subject valid for `lifetime` starting at `issued_at`.
    ///
    /// # Returns
    /// Claims with `sub`, `iat` and `exp` set
    pub fn for_subject(sub: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self::new()
            .with_subject(sub)
            .with_issued_at(issued_at.timestamp())
            .with_expiration((issued_at + lifetime).timestamp())
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Read a custom string field.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }

    /// Read a custom integer field.
    pub fn extra_i64(&self, key: &str) -> Option<i64> {
        self.extra.get(key).and_then(|v| v.as_i64())
    }

    /// Seconds between `iat` and `exp`, when both are present.
    pub fn lifetime_seconds(&self) -> Option<i64> {
        Some(self.exp? - self.iat?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("ana@x.com");
        assert_eq!(claims.sub, Some("ana@x.com".to_string()));
        assert!(claims.exp.is_none());
        assert!(claims.lifetime_seconds().is_none());
    }

    #[test]
    fn test_for_subject() {
        let issued_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let claims = Claims::for_subject("ana@x.com", issued_at, Duration::seconds(3600));

        assert_eq!(claims.sub.as_deref(), Some("ana@x.com"));
        assert_eq!(claims.iat, Some(issued_at.timestamp()));
        assert_eq!(claims.exp, Some(issued_at.timestamp() + 3600));
        assert_eq!(claims.lifetime_seconds(), Some(3600));
    }

    #[test]
    fn test_extra_fields_are_flattened() {
        let claims = Claims::new()
            .with_subject("ana@x.com")
            .with_issuer("identity-service")
            .with_extra("userId", 42_i64)
            .with_extra("name", "Ana");

        assert_eq!(claims.extra_i64("userId"), Some(42));
        assert_eq!(claims.extra_str("name"), Some("Ana"));
        assert_eq!(claims.extra_str("userId"), None);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 42);
        assert_eq!(json["iss"], "identity-service");
        assert!(json.get("exp").is_none());
    }
}
