//! # Vitrina Core
//!
//! Core types and utilities shared by every Vitrina crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing, verification and strength policy
//!
//! # Example
//!
//! ```ignore
//! use vitrina_core::errors::AppError;
//! use vitrina_core::password::{hash_password, validate_password_strength};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Product not found"));
//!
//! validate_password_strength("Tr1cky-Garden-42", &["maria"])?;
//! let hash = hash_password("Tr1cky-Garden-42")?;
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorResponse, FieldErrors};
pub use password::{hash_password, validate_password_strength, verify_password};
