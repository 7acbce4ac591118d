//! Role-based authorization.
//!
//! Three predicates decide access from the subject's role. A missing
//! subject is denied by every predicate.
//!
//! | Predicate | ADMIN | STAFF | CLIENTE | anonymous |
//! |-----------|-------|-------|---------|-----------|
//! | [`is_admin`] | yes | no | no | no |
//! | [`is_staff`] | yes | yes | no | no |
//! | [`is_cliente`] | no | no | yes | no |
//!
//! Handlers enforce them through the [`RequireStaff`] and [`RequireAdmin`]
//! extractors, which answer 401 without a valid token and 403 when the
//! predicate denies.

use axum::{extract::FromRequestParts, http::request::Parts};
use vitrina_core::AppError;
use vitrina_models::Role;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

pub fn is_admin(subject: Option<&AuthUser>) -> bool {
    match subject.map(AuthUser::role) {
        Some(Role::Admin) => true,
        Some(Role::Staff | Role::Cliente) | None => false,
    }
}

pub fn is_staff(subject: Option<&AuthUser>) -> bool {
    match subject.map(AuthUser::role) {
        Some(Role::Admin | Role::Staff) => true,
        Some(Role::Cliente) | None => false,
    }
}

pub fn is_cliente(subject: Option<&AuthUser>) -> bool {
    match subject.map(AuthUser::role) {
        Some(Role::Cliente) => true,
        Some(Role::Admin | Role::Staff) | None => false,
    }
}

fn ensure(allowed: bool) -> Result<(), AppError> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden(PERMISSION_DENIED).with_detail_key())
    }
}

/// Admits ADMIN and STAFF.
#[derive(Debug, Clone)]
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        ensure(is_staff(Some(&auth_user)))?;
        Ok(RequireStaff(auth_user))
    }
}

/// Admits ADMIN only.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        ensure(is_admin(Some(&auth_user)))?;
        Ok(RequireAdmin(auth_user))
    }
}
