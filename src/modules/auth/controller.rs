use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};
use vitrina_core::{AppError, ErrorResponse, FieldErrors};
use vitrina_models::{
    AccessTokenResponse, LoginRequest, ProtectedResponse, RefreshRequest, TokenPairResponse,
};

use crate::metrics::{track_jwt_issued, track_user_login_failure, track_user_login_success};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::modules::auth::AUDIT_TARGET;
use crate::modules::auth::service::{AuthService, NO_ACTIVE_ACCOUNT};
use crate::state::AppState;
use crate::validator::{FIELD_REQUIRED, json_rejection_error};

/// Returns `(username, password)` or a 400 naming every blank field.
fn require_credentials(request: LoginRequest) -> Result<(String, String), AppError> {
    let username = request.username.filter(|v| !v.is_empty());
    let password = request.password.filter(|v| !v.is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        (username, password) => {
            let mut fields = FieldErrors::new();
            if username.is_none() {
                fields.insert("username".to_string(), vec![FIELD_REQUIRED.to_string()]);
            }
            if password.is_none() {
                fields.insert("password".to_string(), vec![FIELD_REQUIRED.to_string()]);
            }
            Err(AppError::validation(fields, FIELD_REQUIRED))
        }
    }
}

async fn login(
    state: &AppState,
    request: LoginRequest,
) -> Result<Json<TokenPairResponse>, AppError> {
    let (username, password) = require_credentials(request)?;

    let user = match AuthService::authenticate(state.store.as_ref(), &username, &password).await? {
        Ok(user) => user,
        Err(failure) => {
            track_user_login_failure(failure.reason());
            return Err(AppError::unauthorized(NO_ACTIVE_ACCOUNT).with_detail_key());
        }
    };

    let tokens = AuthService::issue_tokens(&user, &state.jwt_config)?;
    track_user_login_success(user.role);
    track_jwt_issued("access");
    track_jwt_issued("refresh");
    Ok(Json(tokens))
}

/// Obtain an access/refresh token pair
///
/// Limited per client IP; a throttled attempt answers 429 before the
/// credentials are looked at.
#[utoipa::path(
    post,
    path = "/api/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenPairResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "No active account found with the given credentials", body = ErrorResponse),
        (status = 429, description = "Too many login attempts from this IP"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, body))]
pub async fn token_login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let (username, result) = match body {
        Ok(Json(request)) => {
            let username = request.username.clone().unwrap_or_default();
            (username, login(&state, request).await)
        }
        Err(rejection) => (String::new(), Err(json_rejection_error(rejection))),
    };

    match &result {
        Ok(_) => info!(target: AUDIT_TARGET, username = %username, ip = %ip, "LOGIN OK"),
        Err(_) => warn!(target: AUDIT_TARGET, username = %username, ip = %ip, "LOGIN FAIL"),
    }

    result.into_response()
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/refresh/",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh token", body = ErrorResponse),
        (status = 401, description = "Token is invalid or expired", body = ErrorResponse),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, body))]
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let Json(request) = body.map_err(json_rejection_error)?;
    let refresh = request
        .refresh
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::field("refresh", FIELD_REQUIRED))?;

    let response =
        AuthService::refresh_access_token(state.store.as_ref(), &refresh, &state.jwt_config)
            .await?;
    track_jwt_issued("access");
    Ok(Json(response))
}

/// Confirm that the bearer token is accepted
#[utoipa::path(
    get,
    path = "/api/protected/",
    responses(
        (status = 200, description = "Access granted", body = ProtectedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument]
pub async fn protected(auth_user: AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted".to_string(),
        user: auth_user.username().to_string(),
    })
}
