use tracing::{info, instrument};
use vitrina_core::AppError;
use vitrina_db::{Store, StoreError};
use vitrina_models::{
    CreateProductDto, NewProduct, Product, ProductChanges, ProductId, ProductScope, UserId,
};

use crate::modules::not_found;

pub struct ProductService;

impl ProductService {
    #[instrument(skip(store))]
    pub async fn list_products(
        store: &dyn Store,
        scope: ProductScope,
    ) -> Result<Vec<Product>, AppError> {
        store
            .list_products(scope)
            .await
            .map_err(StoreError::into_app_error)
    }

    /// Creates a product owned by `owner_id`.
    #[instrument(skip(store, dto), fields(product.name = %dto.name))]
    pub async fn create_product(
        store: &dyn Store,
        owner_id: UserId,
        dto: CreateProductDto,
    ) -> Result<Product, AppError> {
        let product = store
            .create_product(NewProduct {
                name: dto.name,
                price: dto.price,
                stock: dto.stock,
                owner_id,
                is_public: dto.is_public,
            })
            .await
            .map_err(StoreError::into_app_error)?;

        info!(product.id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(store))]
    pub async fn get_product(
        store: &dyn Store,
        id: ProductId,
        scope: ProductScope,
    ) -> Result<Product, AppError> {
        store
            .find_product(id, scope)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(not_found)
    }

    #[instrument(skip(store, changes))]
    pub async fn update_product(
        store: &dyn Store,
        id: ProductId,
        scope: ProductScope,
        changes: ProductChanges,
    ) -> Result<Product, AppError> {
        store
            .update_product(id, scope, changes)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(not_found)
    }

    #[instrument(skip(store))]
    pub async fn delete_product(
        store: &dyn Store,
        id: ProductId,
        scope: ProductScope,
    ) -> Result<(), AppError> {
        let deleted = store
            .delete_product(id, scope)
            .await
            .map_err(StoreError::into_app_error)?;

        if !deleted {
            return Err(not_found());
        }
        info!(product.id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use vitrina_db::MemoryStore;
    use vitrina_models::{NewUser, Role};

    async fn owner(store: &MemoryStore) -> UserId {
        store
            .create_user(NewUser {
                username: "owner".to_string(),
                email: "owner@example.com".to_string(),
                password_hash: "hash".to_string(),
                phone: String::new(),
                first_name: String::new(),
                last_name: String::new(),
                role: Role::Staff,
            })
            .await
            .unwrap()
            .id
    }

    fn dto(is_public: bool) -> CreateProductDto {
        CreateProductDto {
            name: "Lamp".to_string(),
            price: Decimal::new(1999, 2),
            stock: 3,
            is_public,
        }
    }

    #[tokio::test]
    async fn test_out_of_scope_product_is_not_found() {
        let store = MemoryStore::new();
        let owner_id = owner(&store).await;
        let product = ProductService::create_product(&store, owner_id, dto(false))
            .await
            .unwrap();

        let err = ProductService::get_product(&store, product.id, ProductScope::PublicOnly)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = ProductService::delete_product(&store, product.id, ProductScope::PublicOnly)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        assert!(
            ProductService::delete_product(&store, product.id, ProductScope::All)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_create_sets_owner() {
        let store = MemoryStore::new();
        let owner_id = owner(&store).await;
        let product = ProductService::create_product(&store, owner_id, dto(true))
            .await
            .unwrap();
        assert_eq!(product.owner_id, owner_id);
        assert!(product.is_public);
    }
}
