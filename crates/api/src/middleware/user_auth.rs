//! Owner authentication middleware.
//!
//! Owner routes carry a bearer token issued by the identity provider; its
//! subject is the owner id that scopes every query.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated owner, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    /// Validates a token and reads the owner id from its subject.
    pub fn validate(jwt: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt.validate_token(token)?;
        let user_id = extract_user_id(&claims)?;
        Ok(Self { user_id })
    }
}

/// Returns the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticates a request from its headers.
pub fn authenticate(jwt: &JwtConfig, headers: &HeaderMap) -> Result<AuthenticatedUser, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid Authorization header".into()))?;

    AuthenticatedUser::validate(jwt, token).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".into()),
            _ => ApiError::Unauthorized("Invalid or expired token".into()),
        }
    })
}

/// Rejects requests without a valid owner token; on success the owner is
/// placed in request extensions for the rate limiter and handlers.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state.jwt, req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use shared::jwt::Claims;

    const SECRET: &str = "menuboard-test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("Basic Zm9vOmJhcg==")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_accepts_valid_token() {
        let jwt = JwtConfig::new(SECRET, None, 0).unwrap();
        let owner = Uuid::new_v4();
        let token = jwt.sign(&Claims::for_user(owner, 3600)).unwrap();

        let user = authenticate(&jwt, &headers_with(&format!("Bearer {}", token))).unwrap();
        assert_eq!(user.user_id, owner);
    }

    #[test]
    fn test_authenticate_rejects_foreign_signature() {
        let ours = JwtConfig::new(SECRET, None, 0).unwrap();
        let theirs = JwtConfig::new("someone-else", None, 0).unwrap();
        let token = theirs.sign(&Claims::for_user(Uuid::new_v4(), 3600)).unwrap();

        let result = authenticate(&ours, &headers_with(&format!("Bearer {}", token)));
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_authenticate_checks_audience_when_configured() {
        let jwt = JwtConfig::new(SECRET, Some("authenticated".to_string()), 0).unwrap();
        let owner = Uuid::new_v4();

        let good = jwt
            .sign(&Claims::for_user(owner, 3600).with_audience("authenticated"))
            .unwrap();
        assert!(authenticate(&jwt, &headers_with(&format!("Bearer {}", good))).is_ok());

        let bad = jwt
            .sign(&Claims::for_user(owner, 3600).with_audience("anon"))
            .unwrap();
        assert!(authenticate(&jwt, &headers_with(&format!("Bearer {}", bad))).is_err());
    }
}
