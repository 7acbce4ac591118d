//! # Vitrina Cache
//!
//! Counter stores backing the login throttle.
//!
//! This crate provides:
//! - The [`ThrottleStore`] trait: a sliding log of hit timestamps per key
//! - [`MemoryThrottleStore`] for single-process deployments and tests
//! - [`RedisThrottleStore`] for deployments sharing counters across instances
//! - [`LoginThrottle`], the attempt limiter built on top of a store
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vitrina_cache::{LoginThrottle, MemoryThrottleStore, ThrottleDecision};
//!
//! let throttle = LoginThrottle::new(Arc::new(MemoryThrottleStore::new()), 5, Duration::from_secs(60));
//!
//! match throttle.check("203.0.113.7").await? {
//!     ThrottleDecision::Allowed => { /* verify credentials */ }
//!     ThrottleDecision::Throttled { retry_after_secs } => { /* answer 429 */ }
//! }
//! ```

pub mod config;
pub mod memory;
pub mod redis;
pub mod store;
pub mod throttle;

pub use config::CacheConfig;
pub use memory::MemoryThrottleStore;
pub use redis::RedisThrottleStore;
pub use store::{CacheError, HitOutcome, ThrottleStore};
pub use throttle::{LoginThrottle, ThrottleDecision};
