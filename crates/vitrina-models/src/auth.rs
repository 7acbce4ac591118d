//! Authentication request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::User;

/// Credentials for both the token endpoint and the session-style login.
///
/// Fields are optional at the wire level so a request with a missing
/// field still reaches the handler and can be reported per field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "maria")]
    pub username: Option<String>,
    #[serde(default)]
    #[schema(example = "Tr1cky-Garden-42")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Result of the session-style login.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionLoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: String,
}
