use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{info, instrument};
use vitrina_core::{AppError, ErrorResponse};
use vitrina_models::{
    ChangePasswordDto, CreateUserDto, LoginRequest, MessageResponse, SessionLoginResponse,
    UpdateUserDto, User, UserId, UserListResponse, UserMessageResponse,
};

use crate::metrics::{track_user_created, track_user_login_failure, track_user_login_success};
use crate::middleware::auth::AuthUser;
use crate::modules::auth::service::AuthService;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{FIELD_REQUIRED, ValidatedJson, json_rejection_error};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Register a new account
///
/// Public. The account always gets the CLIENTE role.
#[utoipa::path(
    post,
    path = "/api/users/",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = UserMessageResponse),
        (status = 400, description = "Validation error, password mismatch, weak password or duplicate username/email", body = ErrorResponse),
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<UserMessageResponse>), AppError> {
    let user = UserService::register(state.store.as_ref(), dto).await?;
    track_user_created(user.role);
    Ok((
        StatusCode::CREATED,
        Json(UserMessageResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// List all users, newest first
#[utoipa::path(
    get,
    path = "/api/users/",
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<UserListResponse>, AppError> {
    let users = UserService::list_users(state.store.as_ref()).await?;
    Ok(Json(UserListResponse {
        count: users.len(),
        users,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(state.store.as_ref(), id).await?;
    Ok(Json(user))
}

fn updated(user: User) -> Json<UserMessageResponse> {
    Json(UserMessageResponse {
        message: "User updated successfully".to_string(),
        user,
    })
}

/// Replace a user's profile fields; `email` is required
#[utoipa::path(
    put,
    path = "/api/users/{id}/",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated successfully", body = UserMessageResponse),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserMessageResponse>, AppError> {
    if dto.email.is_none() {
        return Err(AppError::field("email", FIELD_REQUIRED));
    }
    let user = UserService::update_user(state.store.as_ref(), id, dto.into()).await?;
    Ok(updated(user))
}

/// Partially update a user's profile fields
#[utoipa::path(
    patch,
    path = "/api/users/{id}/",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated successfully", body = UserMessageResponse),
        (status = 400, description = "Validation error or duplicate email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn patch_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserMessageResponse>, AppError> {
    let user = UserService::update_user(state.store.as_ref(), id, dto.into()).await?;
    Ok(updated(user))
}

/// Delete a user together with the products it owns
#[utoipa::path(
    delete,
    path = "/api/users/{id}/",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = UserService::delete_user(state.store.as_ref(), id).await?;
    Ok(Json(MessageResponse::new(format!(
        "User {} deleted successfully",
        user.username
    ))))
}

/// The authenticated caller's own record
#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(state.store.as_ref(), auth_user.user_id()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users/change_password/",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed successfully", body = MessageResponse),
        (status = 400, description = "Wrong current password, mismatch or weak new password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_password(state.store.as_ref(), auth_user.user_id(), dto).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Session-style login that returns the user record instead of tokens
#[utoipa::path(
    post,
    path = "/api/users/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionLoginResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    ),
    tag = "Users"
)]
#[instrument(skip(state, body))]
pub async fn session_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionLoginResponse>, AppError> {
    let Json(request) = body.map_err(json_rejection_error)?;
    let username = request
        .username
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::field("username", FIELD_REQUIRED))?;
    let password = request
        .password
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::field("password", FIELD_REQUIRED))?;

    match AuthService::authenticate(state.store.as_ref(), &username, &password).await? {
        Ok(user) => {
            track_user_login_success(user.role);
            Ok(Json(SessionLoginResponse {
                message: "Login successful".to_string(),
                user,
            }))
        }
        Err(failure) => {
            track_user_login_failure(failure.reason());
            Err(AppError::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

/// Acknowledge a logout; tokens expire on their own
#[utoipa::path(
    post,
    path = "/api/users/logout/",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument]
pub async fn logout(auth_user: AuthUser) -> Json<MessageResponse> {
    info!(user.id = %auth_user.user_id(), "User logged out");
    Json(MessageResponse::new("Logout successful"))
}
