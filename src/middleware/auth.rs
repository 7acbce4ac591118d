use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use vitrina_auth::{Claims, verify_token};
use vitrina_core::AppError;
use vitrina_db::StoreError;
use vitrina_models::{Role, UserId};

use crate::state::AppState;

pub const USER_NOT_FOUND: &str = "User not found";
pub const USER_INACTIVE: &str = "User is inactive";

/// Extractor that validates the bearer access token and yields its claims.
///
/// The token's user must still exist and be active. Username and role come
/// from the stored account, so a role change takes effect immediately.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        self.0.sub
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized("Authentication credentials were not provided.")
                    .with_detail_key()
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format").with_detail_key()
        })?;

        let mut claims = verify_token(token, &state.jwt_config)?;

        let user = state
            .store
            .find_user(claims.sub)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::unauthorized(USER_NOT_FOUND).with_detail_key())?;
        if !user.is_active {
            return Err(AppError::unauthorized(USER_INACTIVE).with_detail_key());
        }

        claims.username = user.username;
        claims.role = user.role;
        Ok(AuthUser(claims))
    }
}

/// Reads the subject from the bearer token without rejecting the request.
pub fn optional_subject(parts: &Parts, state: &AppState) -> Option<AuthUser> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| verify_token(token, &state.jwt_config).ok())
        .map(AuthUser)
}
