use tracing::{info, instrument};
use vitrina_core::{AppError, FieldErrors, hash_password, validate_password_strength, verify_password};
use vitrina_db::{Store, StoreError};
use vitrina_models::{
    ChangePasswordDto, CreateUserDto, NewUser, Role, User, UserChanges, UserId,
};

use crate::modules::not_found;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";
pub const CURRENT_PASSWORD_INCORRECT: &str = "Current password is incorrect";

/// Applies the strength policy, reporting failures under `field`.
fn check_password(field: &str, password: &str, attributes: &[&str]) -> Result<(), AppError> {
    validate_password_strength(password, attributes).map_err(|problems| {
        let summary = problems.first().cloned().unwrap_or_default();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), problems);
        AppError::validation(fields, summary)
    })
}

pub struct UserService;

impl UserService {
    /// Registers a CLIENTE account.
    #[instrument(skip(store, dto), fields(user.username = %dto.username))]
    pub async fn register(store: &dyn Store, dto: CreateUserDto) -> Result<User, AppError> {
        if dto.password != dto.password_confirm {
            return Err(AppError::field("password", PASSWORDS_DO_NOT_MATCH));
        }
        check_password(
            "password",
            &dto.password,
            &[dto.username.as_str(), dto.email.as_str()],
        )?;

        let password_hash = hash_password(&dto.password)?;
        let user = store
            .create_user(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash,
                phone: dto.phone,
                first_name: dto.first_name,
                last_name: dto.last_name,
                role: Role::Cliente,
            })
            .await
            .map_err(StoreError::into_app_error)?;

        info!(user.id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn list_users(store: &dyn Store) -> Result<Vec<User>, AppError> {
        store.list_users().await.map_err(StoreError::into_app_error)
    }

    #[instrument(skip(store))]
    pub async fn get_user(store: &dyn Store, id: UserId) -> Result<User, AppError> {
        store
            .find_user(id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(not_found)
    }

    #[instrument(skip(store, changes))]
    pub async fn update_user(
        store: &dyn Store,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, AppError> {
        store
            .update_user(id, changes)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(not_found)
    }

    /// Deletes the user and every product it owns.
    #[instrument(skip(store))]
    pub async fn delete_user(store: &dyn Store, id: UserId) -> Result<User, AppError> {
        let user = store
            .delete_user(id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(not_found)?;

        info!(user.id = %user.id, user.username = %user.username, "User deleted");
        Ok(user)
    }

    #[instrument(skip(store, dto))]
    pub async fn change_password(
        store: &dyn Store,
        user_id: UserId,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let user = Self::get_user(store, user_id).await?;

        if dto.new_password != dto.new_password_confirm {
            return Err(AppError::field("new_password", PASSWORDS_DO_NOT_MATCH));
        }
        check_password(
            "new_password",
            &dto.new_password,
            &[user.username.as_str(), user.email.as_str()],
        )?;
        if !verify_password(&dto.old_password, &user.password_hash)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                CURRENT_PASSWORD_INCORRECT
            )));
        }

        let password_hash = hash_password(&dto.new_password)?;
        let updated = store
            .set_password(user.id, &password_hash)
            .await
            .map_err(StoreError::into_app_error)?;
        if !updated {
            return Err(not_found());
        }

        info!(user.id = %user.id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use vitrina_db::MemoryStore;

    fn registration(username: &str, password: &str, confirm: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
            phone: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_weak_password_lists_every_problem() {
        let err = check_password("password", "1234", &[]).unwrap_err();
        let problems = &err.fields.unwrap()["password"];
        assert_eq!(problems.len(), 2);
    }

    #[tokio::test]
    async fn test_register_rejects_mismatch() {
        let store = MemoryStore::new();
        let err = UserService::register(
            &store,
            registration("ana", "Tr1cky-Garden-42", "Tr1cky-Garden-43"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.fields.unwrap()["password"],
            vec![PASSWORDS_DO_NOT_MATCH.to_string()]
        );
    }

    #[tokio::test]
    async fn test_register_rejects_password_like_username() {
        let store = MemoryStore::new();
        let err = UserService::register(
            &store,
            registration("carlosgarcia", "carlosgarcia1", "carlosgarcia1"),
        )
        .await
        .unwrap_err();
        assert!(err.fields.unwrap().contains_key("password"));
    }

    #[tokio::test]
    async fn test_register_creates_cliente() {
        let store = MemoryStore::new();
        let user = UserService::register(
            &store,
            registration("ana", "Tr1cky-Garden-42", "Tr1cky-Garden-42"),
        )
        .await
        .unwrap();
        assert_eq!(user.role, Role::Cliente);
        assert!(verify_password("Tr1cky-Garden-42", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_change_password_checks_new_password_before_old() {
        let store = MemoryStore::new();
        let user = UserService::register(
            &store,
            registration("ana", "Tr1cky-Garden-42", "Tr1cky-Garden-42"),
        )
        .await
        .unwrap();

        let err = UserService::change_password(
            &store,
            user.id,
            ChangePasswordDto {
                old_password: "not-my-password".to_string(),
                new_password: "Fresh-Meadow-77".to_string(),
                new_password_confirm: "Fresh-Meadow-78".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.fields.unwrap()["new_password"],
            vec![PASSWORDS_DO_NOT_MATCH.to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let err = UserService::get_user(&store, UserId::new()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
