//! Attempt limiter for the login endpoint.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::store::{CacheError, HitOutcome, ThrottleStore};

/// Outcome of consulting the throttle for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The attempt was recorded and may proceed.
    Allowed,
    /// The window is full. Nothing was recorded.
    Throttled { retry_after_secs: u64 },
}

/// At most `max_attempts` per `window` for each key.
pub struct LoginThrottle {
    store: Arc<dyn ThrottleStore>,
    max_attempts: u32,
    window: Duration,
}

impl std::fmt::Debug for LoginThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginThrottle")
            .field("max_attempts", &self.max_attempts)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl LoginThrottle {
    pub fn new(store: Arc<dyn ThrottleStore>, max_attempts: u32, window: Duration) -> Self {
        Self {
            store,
            max_attempts,
            window,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks and records an attempt for `client` at the current time.
    pub async fn check(&self, client: &str) -> Result<ThrottleDecision, CacheError> {
        self.check_at(client, unix_millis()).await
    }

    /// Same as [`check`](Self::check) with an explicit clock, in Unix milliseconds.
    pub async fn check_at(&self, client: &str, now_ms: i64) -> Result<ThrottleDecision, CacheError> {
        let key = format!("throttle:login:{client}");
        let window_ms = self.window.as_millis() as i64;

        match self
            .store
            .hit(&key, now_ms, window_ms, self.max_attempts)
            .await?
        {
            HitOutcome::Recorded { .. } => Ok(ThrottleDecision::Allowed),
            HitOutcome::Rejected { oldest_ms } => {
                let wait_ms = (oldest_ms + window_ms - now_ms).max(0) as u64;
                let retry_after_secs = wait_ms.div_ceil(1000).max(1);
                debug!(throttle.key = %key, throttle.retry_after = retry_after_secs, "Login attempt throttled");
                Ok(ThrottleDecision::Throttled { retry_after_secs })
            }
        }
    }

    /// Drops clients whose attempts have all left the window.
    pub fn retain_recent(&self) -> usize {
        self.store
            .retain_recent(unix_millis(), self.window.as_millis() as i64)
    }
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
