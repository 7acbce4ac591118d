//! # Vitrina CLI
//!
//! Database seeding utilities for Vitrina testing and development.
//!
//! ## Usage
//!
//! ```ignore
//! use vitrina_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(5, 20); // 5 users, 20 products
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
