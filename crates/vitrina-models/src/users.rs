//! User domain models and DTOs.
//!
//! [`User`] is the stored entity. It never serializes the password hash, so
//! it can be returned from handlers directly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::UserId;
use crate::roles::Role;

/// A registered user.
#[derive(Serialize, FromRow, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Values for inserting a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Letters, digits and `@ . + - _`, as accepted for usernames.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(
            "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        );
        Err(error)
    }
}

/// Public registration payload.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"),
        custom(function = "validate_username")
    )]
    #[schema(example = "maria")]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[schema(example = "Tr1cky-Garden-42")]
    pub password: String,
    #[schema(example = "Tr1cky-Garden-42")]
    pub password_confirm: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "First name must not exceed 150 characters"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Last name must not exceed 150 characters"))]
    pub last_name: String,
}

/// Profile update payload used by both PUT and PATCH.
///
/// PUT additionally requires `email`.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must not exceed 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 150, message = "First name must not exceed 150 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Last name must not exceed 150 characters"))]
    pub last_name: Option<String>,
}

impl From<UpdateUserDto> for UserChanges {
    fn from(dto: UpdateUserDto) -> Self {
        Self {
            email: dto.email,
            phone: dto.phone,
            first_name: dto.first_name,
            last_name: dto.last_name,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserListResponse {
    pub count: usize,
    pub users: Vec<User>,
}

/// A message together with the affected user.
#[derive(Serialize, Debug, ToSchema)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: User,
}
