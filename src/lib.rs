//! # Vitrina API
//!
//! A product catalogue backend built with Axum. Users authenticate with
//! JWTs and see products according to their role.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractors, role predicates, client IP, throttling
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Token login with audit log, refresh, protected check
//! │   ├── users/       # Registration and account management
//! │   └── products/    # Role-scoped product CRUD
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus metrics
//! ├── router.rs         # Route table and global layers
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Workspace crates hold everything that is not HTTP: `vitrina-models`,
//! `vitrina-db` (the [`Store`](vitrina_db::Store) trait with PostgreSQL and
//! in-memory backends), `vitrina-cache` (login throttle counters),
//! `vitrina-auth`, `vitrina-config` and `vitrina-core`.
//!
//! ## Roles
//!
//! | Role | Sees | May create/update | May delete |
//! |------|------|-------------------|------------|
//! | ADMIN | every product | yes | yes |
//! | STAFF | public products | yes | no |
//! | CLIENTE | own products | no | no |
//!
//! ADMIN accounts are created with `vitrina-cli create-admin`; public
//! registration always yields CLIENTE.
//!
//! ## Login throttling
//!
//! `POST /api/login/` accepts at most `LOGIN_RATE_LIMIT_ATTEMPTS` attempts
//! per client IP in a sliding `LOGIN_RATE_LIMIT_WINDOW_SECS` window. Every
//! attempt that gets through is audited under the `vitrina::audit` target.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use vitrina_auth;
pub use vitrina_cache;
pub use vitrina_config;
pub use vitrina_core;
pub use vitrina_db;
pub use vitrina_models;
