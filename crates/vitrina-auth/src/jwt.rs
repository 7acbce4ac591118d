//! Token creation and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. Access tokens
//! embed the subject's username and role; refresh tokens only identify the
//! subject and are exchanged for a fresh access token after the user is
//! re-read from the store.
//!
//! # Example
//!
//! ```ignore
//! use vitrina_auth::{create_access_token, verify_token};
//! use vitrina_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user.id, &user.username, user.role, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, user.role);
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use vitrina_config::JwtConfig;
use vitrina_core::AppError;
use vitrina_models::{Role, UserId};

use crate::claims::{Claims, RefreshTokenClaims, TokenType};

fn sign<T: Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

fn decode_claims<T: DeserializeOwned>(token: &str, jwt_config: &JwtConfig) -> Option<T> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Returns `(issued_at, expires_at)` for a token living `ttl_secs`.
fn lifetime(ttl_secs: i64) -> (usize, usize) {
    let now = Utc::now().timestamp().max(0) as usize;
    (now, now + ttl_secs.max(0) as usize)
}

pub fn create_access_token(
    user_id: UserId,
    username: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let (iat, exp) = lifetime(jwt_config.access_token_expiry);

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        token_type: TokenType::Access,
        exp,
        iat,
    };

    sign(&claims, jwt_config)
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode_claims::<Claims>(token, jwt_config)
        .filter(|claims| claims.token_type == TokenType::Access)
        .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))
}

pub fn create_refresh_token(user_id: UserId, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let (iat, exp) = lifetime(jwt_config.refresh_token_expiry);

    let claims = RefreshTokenClaims {
        sub: user_id,
        token_type: TokenType::Refresh,
        exp,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, jwt_config)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, AppError> {
    decode_claims::<RefreshTokenClaims>(token, jwt_config)
        .filter(|claims| claims.token_type == TokenType::Refresh)
        .ok_or_else(|| AppError::unauthorized("Token is invalid or expired").with_detail_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = get_test_jwt_config();
        let user_id = UserId::new();

        let token = create_access_token(user_id, "maria", Role::Admin, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "maria");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(UserId::new(), "maria", Role::Cliente, &config).unwrap();

        let other = JwtConfig {
            secret: "a-completely-different-secret-value".to_string(),
            ..config
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: UserId::new(),
            username: "maria".to_string(),
            role: Role::Cliente,
            token_type: TokenType::Access,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = sign(&claims, &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = get_test_jwt_config();
        let refresh = create_refresh_token(UserId::new(), &config).unwrap();

        assert!(verify_token(&refresh, &config).is_err());
        assert!(verify_refresh_token(&refresh, &config).is_ok());
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let config = get_test_jwt_config();
        let access = create_access_token(UserId::new(), "maria", Role::Staff, &config).unwrap();
        assert!(verify_refresh_token(&access, &config).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let user_id = UserId::new();
        let first = create_refresh_token(user_id, &config).unwrap();
        let second = create_refresh_token(user_id, &config).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = get_test_jwt_config();
        assert!(verify_token("not.a.jwt", &config).is_err());
    }
}
