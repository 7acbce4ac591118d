//! Rate limiting configuration.
//!
//! Two independent limits protect the API:
//!
//! - The **login throttle** keeps a sliding log of attempts per client IP on
//!   `POST /api/login/`. Every accepted attempt is recorded, successful or not.
//! - The **general throttle** applies to every other `/api` route, keyed by user id
//!   for requests carrying a valid access token and by client IP otherwise.
//!
//! # Configuration
//!
//! - `LOGIN_RATE_LIMIT_ENABLED`: Toggle the login throttle (default: true)
//! - `LOGIN_RATE_LIMIT_ATTEMPTS`: Attempts allowed per window (default: 5)
//! - `LOGIN_RATE_LIMIT_WINDOW_SECS`: Window length in seconds (default: 60)
//! - `RATE_LIMIT_ENABLED`: Toggle the general throttle (default: true)
//! - `RATE_LIMIT_ANON_PER_MINUTE`: Anonymous requests per minute (default: 20)
//! - `RATE_LIMIT_USER_PER_MINUTE`: Authenticated requests per minute (default: 100)
//! - `TRUST_PROXY_HEADERS`: Read the client IP from `X-Forwarded-For` /
//!   `X-Real-IP` instead of the socket peer address (default: false)
//!
//! # Example
//!
//! ```ignore
//! use vitrina_config::RateLimitConfig;
//!
//! // Test suites switch both throttles off.
//! let config = RateLimitConfig::disabled();
//! assert!(!config.login_enabled);
//! ```

use crate::env;

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Whether the login throttle is consulted at all.
    pub login_enabled: bool,

    /// Maximum login attempts per client IP inside one window.
    ///
    /// The attempt that would exceed this count is rejected with 429
    /// before credentials are examined.
    pub login_max_attempts: u32,

    /// Length of the sliding login window in seconds.
    pub login_window_secs: u64,

    /// Whether the general API throttle is applied.
    pub general_enabled: bool,

    /// Requests per minute for clients without a valid access token.
    pub anon_per_minute: u32,

    /// Requests per minute for authenticated users, keyed by user id.
    pub user_per_minute: u32,

    /// Resolve the client IP from proxy headers.
    ///
    /// Only enable this behind a reverse proxy that overwrites these
    /// headers, otherwise any client can pick its own throttle key.
    pub trust_proxy_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_enabled: true,
            login_max_attempts: 5,
            login_window_secs: 60,
            general_enabled: true,
            anon_per_minute: 20,
            user_per_minute: 100,
            trust_proxy_headers: false,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if environment variables are not set
    /// or cannot be parsed.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            login_enabled: env::flag("LOGIN_RATE_LIMIT_ENABLED", defaults.login_enabled),
            login_max_attempts: env::parsed(
                "LOGIN_RATE_LIMIT_ATTEMPTS",
                defaults.login_max_attempts,
            ),
            login_window_secs: env::parsed(
                "LOGIN_RATE_LIMIT_WINDOW_SECS",
                defaults.login_window_secs,
            ),
            general_enabled: env::flag("RATE_LIMIT_ENABLED", defaults.general_enabled),
            anon_per_minute: env::parsed("RATE_LIMIT_ANON_PER_MINUTE", defaults.anon_per_minute),
            user_per_minute: env::parsed("RATE_LIMIT_USER_PER_MINUTE", defaults.user_per_minute),
            trust_proxy_headers: env::flag("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers),
        }
    }

    /// Configuration with both throttles switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            login_enabled: false,
            general_enabled: false,
            ..Self::default()
        }
    }
}
