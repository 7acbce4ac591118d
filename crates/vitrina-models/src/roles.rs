//! User roles.
//!
//! Stored as the Postgres enum `user_role` and serialized in upper case
//! (`"ADMIN"`, `"STAFF"`, `"CLIENTE"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Staff,
    #[default]
    Cliente,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Staff, Role::Cliente];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
            Role::Cliente => "CLIENTE",
        }
    }

    /// Privilege rank, higher means more access.
    pub fn level(&self) -> u8 {
        match self {
            Role::Admin => 2,
            Role::Staff => 1,
            Role::Cliente => 0,
        }
    }

    /// Whether this role grants at least the access of `minimum`.
    pub fn at_least(&self, minimum: Role) -> bool {
        self.level() >= minimum.level()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            "CLIENTE" => Ok(Role::Cliente),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
