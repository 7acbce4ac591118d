//! Redis-backed [`ThrottleStore`].
//!
//! Each key is a sorted set whose members are hits scored by their
//! timestamp. A hit runs as one Lua script so that concurrent attempts
//! on the same key cannot all observe a non-full window.

use std::sync::LazyLock;

use async_trait::async_trait;
use redis::{Client, Script, aio::ConnectionManager};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::store::{CacheError, HitOutcome, ThrottleStore};

/// KEYS[1] = window key; ARGV = now_ms, window_ms, limit, member.
/// Returns `{1, count}` when recorded and `{0, oldest_ms}` when rejected.
const HIT_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
local count = redis.call('ZCARD', key)
if count >= limit then
    local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
    return {0, tonumber(oldest[2]) or now}
end

redis.call('ZADD', key, now, ARGV[4])
redis.call('PEXPIRE', key, window)
return {1, count + 1}
"#;

static HIT: LazyLock<Script> = LazyLock::new(|| Script::new(HIT_SCRIPT));

#[derive(Clone)]
pub struct RedisThrottleStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisThrottleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisThrottleStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisThrottleStore {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn new(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ThrottleStore for RedisThrottleStore {
    #[instrument(skip(self), fields(cache.operation = "ZHIT"))]
    async fn hit(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
        limit: u32,
    ) -> Result<HitOutcome, CacheError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let member = format!("{now_ms}-{}", Uuid::new_v4());

        let (recorded, value): (i64, i64) = HIT
            .key(&key)
            .arg(now_ms)
            .arg(window_ms)
            .arg(limit)
            .arg(member)
            .invoke_async(&mut conn)
            .await?;

        debug!(cache.key = %key, recorded = recorded == 1, "Throttle hit");

        Ok(if recorded == 1 {
            HitOutcome::Recorded {
                count: u32::try_from(value).unwrap_or(u32::MAX),
            }
        } else {
            HitOutcome::Rejected { oldest_ms: value }
        })
    }
}
