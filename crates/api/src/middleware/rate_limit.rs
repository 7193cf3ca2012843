//! Rate limiting middleware.
//!
//! Owner routes are limited per authenticated owner, public routes per
//! client address. Both use governor's keyed GCRA limiter.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{clock::Clock, clock::DefaultClock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::hash::Hash;
use std::num::NonZeroU32;
use uuid::Uuid;

use crate::app::AppState;
use crate::extractors::ClientIp;
use crate::middleware::user_auth::AuthenticatedUser;

/// Keys kept before idle entries are purged.
const PRUNE_THRESHOLD: usize = 10_000;

/// Per-key limiter allowing `rate_limit_per_minute` requests per minute.
pub struct RateLimiterState<K: Hash + Eq + Clone> {
    limiter: DefaultKeyedRateLimiter<K>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl<K: Hash + Eq + Clone> RateLimiterState<K> {
    /// Returns `None` for a limit of 0, which disables limiting.
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// Returns `Err(retry_after_secs)` when `key` is over its quota.
    pub fn check(&self, key: &K) -> Result<(), u64> {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }

        self.limiter.check_key(key).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }
}

impl<K: Hash + Eq + Clone> std::fmt::Debug for RateLimiterState<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_keys", &self.limiter.len())
            .finish()
    }
}

/// Limits authenticated owner routes. Must run after `require_user_auth`.
pub async fn owner_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (Some(limiter), Some(user)) = (
        state.rate_limiter.as_deref(),
        req.extensions().get::<AuthenticatedUser>().copied(),
    ) else {
        return next.run(req).await;
    };

    if let Err(retry_after) = limiter.check(&user.user_id) {
        tracing::warn!(owner_id = %user.user_id, retry_after, "Owner rate limit exceeded");
        return rate_limited_response(limiter.rate_limit_per_minute(), retry_after);
    }

    next.run(req).await
}

/// Limits public routes by client address.
pub async fn public_rate_limit(
    State(state): State<AppState>,
    client_ip: ClientIp,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.public_rate_limiter.as_deref() else {
        return next.run(req).await;
    };

    if let Err(retry_after) = limiter.check(&client_ip.0) {
        tracing::warn!(client_ip = %client_ip.0, retry_after, "Public rate limit exceeded");
        return rate_limited_response(limiter.rate_limit_per_minute(), retry_after);
    }

    next.run(req).await
}

/// 429 with a `Retry-After` header.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

/// Owner limiter type stored in application state.
pub type OwnerRateLimiter = RateLimiterState<Uuid>;
/// Public limiter type stored in application state.
pub type PublicRateLimiter = RateLimiterState<String>;
