use async_trait::async_trait;
use vitrina_models::{
    NewProduct, NewUser, Product, ProductChanges, ProductId, ProductScope, User, UserChanges,
    UserId,
};

use crate::error::StoreError;

/// Storage operations needed by the HTTP layer.
///
/// Every product operation is filtered by a [`ProductScope`]. A product that
/// exists but falls outside the scope behaves exactly like a missing one.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Inserts a user. Fails with [`StoreError::Conflict`] on a taken
    /// username or email.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn update_user(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;

    /// Replaces the stored hash. Returns `false` when the user does not exist.
    async fn set_password(&self, id: UserId, password_hash: &str) -> Result<bool, StoreError>;

    /// Deletes a user together with every product it owns and returns the
    /// removed row.
    async fn delete_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn create_product(&self, new_product: NewProduct) -> Result<Product, StoreError>;

    /// Products inside `scope`, oldest first.
    async fn list_products(&self, scope: ProductScope) -> Result<Vec<Product>, StoreError>;

    async fn find_product(
        &self,
        id: ProductId,
        scope: ProductScope,
    ) -> Result<Option<Product>, StoreError>;

    async fn update_product(
        &self,
        id: ProductId,
        scope: ProductScope,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError>;

    /// Returns `true` when a product inside `scope` was removed.
    async fn delete_product(&self, id: ProductId, scope: ProductScope) -> Result<bool, StoreError>;
}
