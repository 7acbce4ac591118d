//! Redis connection settings.

use std::env;

/// Redis configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `CACHE_PREFIX`: Prefix for all throttle keys (default: `vitrina`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub redis_url: String,

    /// Prefix for all keys, so several deployments can share one Redis.
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }

    /// Build a prefixed key.
    ///
    /// ```ignore
    /// let key = CacheConfig::default().prefixed_key("throttle:login:10.0.0.1");
    /// // "vitrina:throttle:login:10.0.0.1"
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".into(),
            key_prefix: "vitrina".into(),
        }
    }
}
