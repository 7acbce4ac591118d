//! In-process [`Store`] backed by vectors behind a mutex.
//!
//! Mirrors the PostgreSQL constraints that matter to callers: unique
//! usernames and emails, and products disappearing with their owner.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use vitrina_models::{
    NewProduct, NewUser, Product, ProductChanges, ProductId, ProductScope, User, UserChanges,
    UserId,
};

use crate::error::StoreError;
use crate::store::Store;

#[derive(Debug, Default)]
struct Tables {
    /// Insertion order.
    users: Vec<User>,
    /// Insertion order.
    products: Vec<Product>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Tables {
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<UserId>,
    ) -> Result<(), StoreError> {
        let others = self.users.iter().filter(|u| Some(u.id) != except);
        for user in others {
            if username.is_some_and(|name| user.username == name) {
                return Err(StoreError::Conflict { field: "username" });
            }
            if email.is_some_and(|email| user.email == email) {
                return Err(StoreError::Conflict { field: "email" });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        tables.check_unique(Some(&new_user.username), Some(&new_user.email), None)?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            phone: new_user.phone,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables().users.iter().rev().cloned().collect())
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables();
        tables.check_unique(None, changes.email.as_deref(), Some(id))?;

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_password(&self, id: UserId, password_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables();
        let Some(index) = tables.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let user = tables.users.remove(index);
        tables.products.retain(|p| p.owner_id != id);
        Ok(Some(user))
    }

    async fn create_product(&self, new_product: NewProduct) -> Result<Product, StoreError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.id == new_product.owner_id) {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }

        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            name: new_product.name,
            price: new_product.price,
            stock: new_product.stock,
            owner_id: new_product.owner_id,
            is_public: new_product.is_public,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn list_products(&self, scope: ProductScope) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .filter(|p| scope.admits(p))
            .cloned()
            .collect())
    }

    async fn find_product(
        &self,
        id: ProductId,
        scope: ProductScope,
    ) -> Result<Option<Product>, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .find(|p| p.id == id && scope.admits(p))
            .cloned())
    }

    async fn update_product(
        &self,
        id: ProductId,
        scope: ProductScope,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let mut tables = self.tables();
        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.id == id && scope.admits(p))
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(is_public) = changes.is_public {
            product.is_public = is_public;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: ProductId, scope: ProductScope) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.products.len();
        tables.products.retain(|p| !(p.id == id && scope.admits(p)));
        Ok(tables.products.len() < before)
    }
}
