//! Request throttling.
//!
//! - [`login_throttle_middleware`]: sliding-log limit per client IP on the
//!   token login route, backed by the injected [`LoginThrottle`](vitrina_cache::LoginThrottle)
//! - [`api_rate_limit_middleware`]: GCRA limit on every `/api` route, keyed
//!   by user id for authenticated requests and by client IP otherwise

use std::num::NonZeroU32;

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    DefaultKeyedRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use serde_json::json;
use tracing::{error, warn};
use vitrina_cache::ThrottleDecision;
use vitrina_config::RateLimitConfig;
use vitrina_models::UserId;

use crate::metrics::track_login_throttled;
use crate::middleware::auth::optional_subject;
use crate::middleware::client_ip::client_ip_from_parts;
use crate::state::AppState;

/// 429 with a `Retry-After` header.
pub fn throttled_response(retry_after_secs: u64) -> Response {
    let body = Json(json!({
        "detail": format!(
            "Request was throttled. Expected available in {retry_after_secs} seconds."
        )
    }));

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after_secs.to_string())],
        body,
    )
        .into_response()
}

/// Rejects login attempts beyond the per-IP window before any credential check.
///
/// Rejected attempts are neither recorded nor audited. If the counter store
/// is unreachable the attempt is let through.
pub async fn login_throttle_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.rate_limit_config.login_enabled {
        return next.run(req).await;
    }

    let (parts, body) = req.into_parts();
    let ip = client_ip_from_parts(&parts, &state);
    let req = Request::from_parts(parts, body);

    match state.login_throttle.check(&ip).await {
        Ok(ThrottleDecision::Allowed) => next.run(req).await,
        Ok(ThrottleDecision::Throttled { retry_after_secs }) => {
            track_login_throttled();
            warn!(ip = %ip, retry_after_secs, "Login attempt throttled");
            throttled_response(retry_after_secs)
        }
        Err(err) => {
            error!(ip = %ip, error = %err, "Login throttle store unavailable");
            next.run(req).await
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThrottleKey {
    User(UserId),
    Anonymous(String),
}

/// Keyed GCRA limiters for anonymous and authenticated traffic.
pub struct ApiRateLimiter {
    anonymous: DefaultKeyedRateLimiter<String>,
    authenticated: DefaultKeyedRateLimiter<UserId>,
}

impl std::fmt::Debug for ApiRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRateLimiter")
            .field("anonymous_keys", &self.anonymous.len())
            .field("authenticated_keys", &self.authenticated.len())
            .finish()
    }
}

fn per_minute(limit: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN))
}

impl ApiRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            anonymous: RateLimiter::keyed(per_minute(config.anon_per_minute)),
            authenticated: RateLimiter::keyed(per_minute(config.user_per_minute)),
        }
    }

    /// Consumes one cell for `key`. On rejection returns the seconds until
    /// the next cell, at least one.
    pub fn check(&self, key: &ThrottleKey) -> Result<(), u64> {
        let outcome = match key {
            ThrottleKey::User(user_id) => self.authenticated.check_key(user_id),
            ThrottleKey::Anonymous(ip) => self.anonymous.check_key(ip),
        };

        outcome.map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            wait.as_secs().max(1)
        })
    }

    /// Drops limiter state for keys that are back at full capacity.
    pub fn retain_recent(&self) {
        self.anonymous.retain_recent();
        self.authenticated.retain_recent();
    }
}

pub async fn api_rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.rate_limit_config.general_enabled {
        return next.run(req).await;
    }

    let (parts, body) = req.into_parts();
    let key = match optional_subject(&parts, &state) {
        Some(subject) => ThrottleKey::User(subject.user_id()),
        None => ThrottleKey::Anonymous(client_ip_from_parts(&parts, &state)),
    };

    if let Err(retry_after_secs) = state.api_limiter.check(&key) {
        warn!(key = ?key, retry_after_secs, "API rate limit exceeded");
        return throttled_response(retry_after_secs);
    }

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn config(anon: u32, user: u32) -> RateLimitConfig {
        RateLimitConfig {
            anon_per_minute: anon,
            user_per_minute: user,
            ..RateLimitConfig::default()
        }
    }

    #[test]
    fn test_anonymous_burst_then_rejected() {
        let limiter = ApiRateLimiter::new(&config(3, 100));
        let key = ThrottleKey::Anonymous("10.0.0.1".to_string());

        for _ in 0..3 {
            assert!(limiter.check(&key).is_ok());
        }
        let retry = limiter.check(&key).unwrap_err();
        assert!(retry >= 1);

        let other = ThrottleKey::Anonymous("10.0.0.2".to_string());
        assert!(limiter.check(&other).is_ok());
    }

    #[test]
    fn test_users_have_their_own_quota() {
        let limiter = ApiRateLimiter::new(&config(1, 2));
        let user = ThrottleKey::User(UserId::new());

        assert!(limiter.check(&user).is_ok());
        assert!(limiter.check(&user).is_ok());
        assert!(limiter.check(&user).is_err());
    }

    #[test]
    fn test_zero_limit_still_allows_one() {
        let limiter = ApiRateLimiter::new(&config(0, 0));
        let key = ThrottleKey::Anonymous("10.0.0.1".to_string());
        assert!(limiter.check(&key).is_ok());
    }

    #[tokio::test]
    async fn test_throttled_response_shape() {
        let response = throttled_response(42);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["detail"],
            "Request was throttled. Expected available in 42 seconds."
        );
    }
}
