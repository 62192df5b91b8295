//! JWT token provider for issuing and validating bearer tokens.

use super::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use registry_config::SecurityConfig;
use registry_core::{RegistryError, RegistryResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    app_name: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider for the named application.
    #[must_use]
    pub fn new(app_name: impl Into<String>, config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;

        Self {
            app_name: app_name.into(),
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Issues a new signed token.
    pub fn issue_token(&self) -> RegistryResult<String> {
        let lifetime = i64::try_from(self.config.jwt_expiration_secs)
            .map_err(|_| RegistryError::Configuration("JWT expiration is too large".to_string()))?;
        let expires_at = Utc::now() + Duration::seconds(lifetime);

        let claims = Claims::new(
            &self.app_name,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RegistryError::Internal(format!("Failed to generate token: {}", e)))?;

        debug!("Issued token {}", claims.jti);
        Ok(token)
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> RegistryResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => RegistryError::TokenExpired,
                    ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                        RegistryError::InvalidToken("Invalid token signature".to_string())
                    }
                    ErrorKind::InvalidIssuer => {
                        RegistryError::InvalidToken("Invalid token issuer".to_string())
                    }
                    ErrorKind::InvalidAudience => {
                        RegistryError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => RegistryError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("app_name", &self.app_name)
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_expiration_secs: 3600,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
        }
    }

    fn create_test_provider() -> TokenProvider {
        TokenProvider::new("user-registry", Arc::new(test_config()))
    }

    #[test]
    fn test_issue_and_validate_token() {
        let provider = create_test_provider();
        let token = provider.issue_token().unwrap();

        let claims = provider.validate_token(&token).unwrap();
        assert!(claims.app_name.starts_with("user-registry - "));
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-audience");
        assert!((3599..=3600).contains(&(claims.exp - claims.iat)));
    }

    #[test]
    fn test_invalid_token() {
        let provider = create_test_provider();
        let result = provider.validate_token("invalid-token");
        assert!(matches!(result, Err(RegistryError::InvalidToken(_))));
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let provider = create_test_provider();
        let other = TokenProvider::new(
            "user-registry",
            Arc::new(SecurityConfig {
                jwt_secret: "a-different-secret".to_string(),
                ..test_config()
            }),
        );

        let token = other.issue_token().unwrap();
        assert!(matches!(
            provider.validate_token(&token),
            Err(RegistryError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let provider = create_test_provider();
        let other = TokenProvider::new(
            "user-registry",
            Arc::new(SecurityConfig {
                jwt_audience: "someone-else".to_string(),
                ..test_config()
            }),
        );

        let token = other.issue_token().unwrap();
        assert!(provider.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let provider = create_test_provider();
        let config = test_config();
        let claims = Claims::new(
            "user-registry",
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
            Utc::now() - Duration::hours(2),
        );
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = provider.validate_token(&token).unwrap_err();
        assert!(matches!(err, RegistryError::TokenExpired));
        assert_eq!(err.to_string(), "Invalid or expired token.");
    }
}
