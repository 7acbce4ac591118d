//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: Bearer token extraction into [`AuthUser`](auth::AuthUser)
//! - [`role`]: Role predicates and the `RequireStaff` / `RequireAdmin` extractors
//! - [`client_ip`]: Requester IP resolution
//! - [`rate_limit`]: Login throttle and general API limiter
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::role::RequireAdmin;
//!
//! // 401 without a valid token, 403 unless the subject is ADMIN
//! async fn delete_product(RequireAdmin(auth_user): RequireAdmin) -> impl IntoResponse {
//!     // ...
//! }
//! ```

pub mod auth;
pub mod client_ip;
pub mod rate_limit;
pub mod role;
