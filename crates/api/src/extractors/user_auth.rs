//! Owner identity extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::{authenticate, AuthenticatedUser};

/// The authenticated owner of the current request.
///
/// Reuses the identity placed in extensions by `require_user_auth`, or
/// validates the bearer token itself when the route has no such layer.
#[derive(Debug, Clone, Copy)]
pub struct UserAuth {
    pub user_id: Uuid,
}

impl From<AuthenticatedUser> for UserAuth {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok((*user).into());
        }

        authenticate(&state.jwt, &parts.headers).map(Into::into)
    }
}
