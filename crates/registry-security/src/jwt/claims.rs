//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an issued bearer token.
///
/// Tokens identify the calling application, not an end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// `"<app name> - <unique id>"`.
    #[serde(rename = "appName")]
    pub app_name: String,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

impl Claims {
    /// Creates claims for a freshly issued token.
    #[must_use]
    pub fn new(app_name: &str, issuer: String, audience: String, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            app_name: format!("{} - {}", app_name, Uuid::new_v4()),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer,
            aud: audience,
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns true if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration as a `DateTime`.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_app_name_is_unique_per_token() {
        let expires = Utc::now() + Duration::hours(1);
        let a = Claims::new("user-registry", "iss".into(), "aud".into(), expires);
        let b = Claims::new("user-registry", "iss".into(), "aud".into(), expires);

        assert!(a.app_name.starts_with("user-registry - "));
        assert_ne!(a.app_name, b.app_name);
        assert_ne!(a.jti, b.jti);
        assert!(!a.is_expired());
    }

    #[test]
    fn test_claims_wire_names() {
        let claims = Claims::new("app", "iss".into(), "aud".into(), Utc::now());
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("appName").is_some());
        assert!(json.get("app_name").is_none());
    }
}
