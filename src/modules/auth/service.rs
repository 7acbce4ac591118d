use tracing::instrument;
use vitrina_auth::{create_access_token, create_refresh_token, verify_refresh_token};
use vitrina_config::JwtConfig;
use vitrina_core::{AppError, verify_password};
use vitrina_db::{Store, StoreError};
use vitrina_models::{AccessTokenResponse, TokenPairResponse, User};

pub const NO_ACTIVE_ACCOUNT: &str = "No active account found with the given credentials";
pub const REFRESH_INVALID: &str = "Token is invalid or expired";

/// Why a credential check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    UnknownUser,
    Inactive,
    BadPassword,
}

impl LoginFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            LoginFailure::UnknownUser => "unknown_user",
            LoginFailure::Inactive => "inactive",
            LoginFailure::BadPassword => "bad_password",
        }
    }
}

pub struct AuthService;

impl AuthService {
    /// Checks `username` and `password` against the store.
    ///
    /// The outer error is a store or hashing failure; the inner one says
    /// why the credentials were refused.
    #[instrument(skip(store, password))]
    pub async fn authenticate(
        store: &dyn Store,
        username: &str,
        password: &str,
    ) -> Result<Result<User, LoginFailure>, AppError> {
        let Some(user) = store
            .find_user_by_username(username)
            .await
            .map_err(StoreError::into_app_error)?
        else {
            return Ok(Err(LoginFailure::UnknownUser));
        };

        if !verify_password(password, &user.password_hash)? {
            return Ok(Err(LoginFailure::BadPassword));
        }
        if !user.is_active {
            return Ok(Err(LoginFailure::Inactive));
        }

        Ok(Ok(user))
    }

    pub fn issue_tokens(user: &User, jwt_config: &JwtConfig) -> Result<TokenPairResponse, AppError> {
        Ok(TokenPairResponse {
            access: create_access_token(user.id, &user.username, user.role, jwt_config)?,
            refresh: create_refresh_token(user.id, jwt_config)?,
        })
    }

    /// Mints an access token for the subject of `refresh_token`, re-reading
    /// the user so a deleted or deactivated account cannot refresh.
    #[instrument(skip(store, refresh_token, jwt_config))]
    pub async fn refresh_access_token(
        store: &dyn Store,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<AccessTokenResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;

        let user = store
            .find_user(claims.sub)
            .await
            .map_err(StoreError::into_app_error)?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::unauthorized(REFRESH_INVALID).with_detail_key())?;

        let access = create_access_token(user.id, &user.username, user.role, jwt_config)?;
        Ok(AccessTokenResponse { access })
    }
}
