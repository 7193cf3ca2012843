//! Verification of session tokens issued by the hosted auth provider.
//!
//! The provider signs access tokens with HS256 using the project's JWT
//! secret. This service never issues tokens for end users; signing is only
//! exposed so local tooling and tests can mint tokens the same way the
//! provider does.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token audience does not match")]
    InvalidAudience,

    #[error("JWT secret is not configured")]
    MissingSecret,
}

/// Audience claim; providers emit either a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Claims carried by a provider access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Provider role, e.g. "authenticated"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Builds claims for `user_id` expiring `expiry_secs` from now.
    pub fn for_user(user_id: Uuid, expiry_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + expiry_secs,
            iat: Some(now),
            aud: None,
            email: None,
            role: Some("authenticated".to_string()),
        }
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.aud = Some(Audience::One(audience.to_string()));
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

/// Configuration for validating provider tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Expected `aud` claim; `None` disables the audience check
    pub audience: Option<String>,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Creates a config from the provider's shared HS256 secret.
    pub fn new(
        secret: &str,
        audience: Option<String>,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.filter(|a| !a.is_empty()),
            leeway_secs,
        })
    }

    /// Signs claims with the shared secret.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidAudience,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extracts user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_jwt_testing_12345";

    fn create_test_config() -> JwtConfig {
        JwtConfig::new(SECRET, None, 0).unwrap()
    }

    #[test]
    fn test_sign_and_validate() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let token = config.sign(&Claims::for_user(user_id, 3600)).unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
        assert!(token.contains('.'), "JWT should have dots separating parts");
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            JwtConfig::new("", None, 0),
            Err(JwtError::MissingSecret)
        ));
    }

    #[test]
    fn test_expired_token() {
        let config = create_test_config();
        let token = config
            .sign(&Claims::for_user(Uuid::new_v4(), -120))
            .unwrap();

        let result = config.validate_token(&token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_expired_token_within_leeway() {
        let config = JwtConfig::new(SECRET, None, 300).unwrap();
        let token = config.sign(&Claims::for_user(Uuid::new_v4(), -60)).unwrap();
        assert!(config.validate_token(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret() {
        let signer = JwtConfig::new("another_secret_entirely", None, 0).unwrap();
        let token = signer.sign(&Claims::for_user(Uuid::new_v4(), 3600)).unwrap();

        let result = create_test_config().validate_token(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let config = JwtConfig::new(SECRET, Some("authenticated".to_string()), 0).unwrap();

        let good = config
            .sign(&Claims::for_user(Uuid::new_v4(), 3600).with_audience("authenticated"))
            .unwrap();
        assert!(config.validate_token(&good).is_ok());

        let bad = config
            .sign(&Claims::for_user(Uuid::new_v4(), 3600).with_audience("anon"))
            .unwrap();
        assert!(matches!(
            config.validate_token(&bad),
            Err(JwtError::InvalidAudience)
        ));
    }

    #[test]
    fn test_audience_ignored_when_not_configured() {
        let config = create_test_config();
        let token = config
            .sign(&Claims::for_user(Uuid::new_v4(), 3600).with_audience("authenticated"))
            .unwrap();
        assert!(config.validate_token(&token).is_ok());
    }

    #[test]
    fn test_malformed_token() {
        let config = create_test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
    }

    #[test]
    fn test_extract_user_id() {
        let user_id = Uuid::new_v4();
        let claims = Claims::for_user(user_id, 60);
        assert_eq!(extract_user_id(&claims).unwrap(), user_id);

        let mut bad = claims;
        bad.sub = "service_role".to_string();
        assert!(matches!(extract_user_id(&bad), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_audience_list_deserialization() {
        let json = r#"{"sub":"x","exp":1,"aud":["a","b"]}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(
            claims.aud,
            Some(Audience::Many(vec!["a".to_string(), "b".to_string()]))
        );
    }

    #[test]
    fn test_jwt_error_display() {
        assert!(format!("{}", JwtError::TokenExpired).contains("expired"));
        assert!(format!("{}", JwtError::InvalidToken).contains("Invalid"));
        assert!(format!("{}", JwtError::EncodingError("test".to_string())).contains("encode"));
        assert!(format!("{}", JwtError::MissingSecret).contains("secret"));
    }
}
