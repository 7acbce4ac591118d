use async_trait::async_trait;

/// Error type for counter store operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] ::redis::RedisError),
}

/// Result of offering one hit to a full or non-full window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The hit was appended; `count` includes it.
    Recorded { count: u32 },
    /// The window already held `limit` hits. Nothing was appended.
    Rejected {
        /// Timestamp of the oldest hit still inside the window, in milliseconds.
        oldest_ms: i64,
    },
}

/// A per-key sliding log of hit timestamps.
///
/// A hit recorded at `t` belongs to every window `(now - window_ms, now]`
/// containing `t`. Timestamps are Unix milliseconds supplied by the caller.
#[async_trait]
pub trait ThrottleStore: Send + Sync + 'static {
    /// Drops expired hits, then appends one at `now_ms` unless `limit` hits
    /// remain. The check and the append are a single atomic step per key.
    async fn hit(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
        limit: u32,
    ) -> Result<HitOutcome, CacheError>;

    /// Forgets keys with no hit left inside the window. Returns how many
    /// keys were dropped. Stores that expire keys on their own keep the default.
    fn retain_recent(&self, _now_ms: i64, _window_ms: i64) -> usize {
        0
    }
}
