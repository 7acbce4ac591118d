//! # Vitrina Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Token signing secret and lifetimes
//! - [`server`]: Bind address, CORS origins and backend selection
//! - [`rate_limit`]: Login and general API throttling
//!
//! # Example
//!
//! ```ignore
//! use vitrina_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! dotenvy::dotenv().ok();
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod env;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{CorsConfig, ServerConfig, StoreBackend, ThrottleBackend};
