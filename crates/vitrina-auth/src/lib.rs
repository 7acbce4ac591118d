//! # Vitrina Auth
//!
//! JWT claim types and token utilities.
//!
//! - [`claims`]: Access and refresh token claims
//! - [`jwt`]: Token creation and verification

pub mod claims;
pub mod jwt;

pub use claims::{Claims, RefreshTokenClaims, TokenType};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
