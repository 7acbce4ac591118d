//! # Vitrina DB
//!
//! Persistence for users and products behind the [`Store`] trait.
//!
//! - [`PgStore`]: PostgreSQL via `sqlx`, used in production
//! - [`MemoryStore`]: process-local maps, used by tests and throwaway instances
//!
//! Product reads and writes take a [`ProductScope`](vitrina_models::ProductScope),
//! so a product outside the caller's visible set is indistinguishable from a
//! missing one.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{PgStore, init_db_pool, run_migrations};
pub use sqlx::PgPool;
pub use store::Store;
