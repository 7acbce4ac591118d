//! JWT claim structures.
//!
//! - [`Claims`]: Access token claims carrying the subject's role
//! - [`RefreshTokenClaims`]: Refresh token claims used to mint new access tokens

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vitrina_models::{Role, UserId};

/// Distinguishes access from refresh tokens signed with the same secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims for access tokens.
///
/// Carries everything the authorization predicates need, so a request can
/// be authorized without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: UserId,
    pub username: String,
    pub role: Role,
    pub token_type: TokenType,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: UserId,
    pub token_type: TokenType,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier
    pub jti: String,
}
