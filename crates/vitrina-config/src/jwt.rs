use crate::env;

/// Signing secret and token lifetimes, in seconds.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "vitrina-dev-secret-change-in-production".to_string(),
            access_token_expiry: 12 * 60 * 60,
            refresh_token_expiry: 7 * 24 * 60 * 60,
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: env::string("JWT_SECRET", &defaults.secret),
            access_token_expiry: env::parsed("JWT_ACCESS_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env::parsed(
                "JWT_REFRESH_EXPIRY",
                defaults.refresh_token_expiry,
            ),
        }
    }
}
