//! PostgreSQL implementation of [`Store`].

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use vitrina_models::{
    NewProduct, NewUser, Product, ProductChanges, ProductId, ProductScope, User, UserChanges,
    UserId,
};

use crate::error::StoreError;
use crate::store::Store;

const USER_COLUMNS: &str = "id, username, email, password_hash, phone, first_name, last_name, \
                            role, is_active, created_at, updated_at";

const PRODUCT_COLUMNS: &str =
    "id, name, price, stock, owner_id, is_public, created_at, updated_at";

/// Opens a connection pool against `database_url`.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Applies the migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Maps unique violations on `users` to a field-level conflict.
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => return StoreError::Conflict { field: "username" },
                Some("users_email_key") => return StoreError::Conflict { field: "email" },
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: ProductScope) {
    match scope {
        ProductScope::All => {
            qb.push("TRUE");
        }
        ProductScope::PublicOnly => {
            qb.push("is_public");
        }
        ProductScope::OwnedBy(owner) => {
            qb.push("owner_id = ").push_bind(owner);
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    #[instrument(skip(self, new_user), fields(user.username = %new_user.username))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, phone, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.phone)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(new_user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    #[instrument(skip(self, changes))]
    async fn update_user(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.phone)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    #[instrument(skip(self, password_hash))]
    async fn set_password(&self, id: UserId, password_hash: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        // products.owner_id cascades
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    #[instrument(skip(self, new_product), fields(product.owner = %new_product.owner_id))]
    async fn create_product(&self, new_product: NewProduct) -> Result<Product, StoreError> {
        let sql = format!(
            "INSERT INTO products (name, price, stock, owner_id, is_public)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&new_product.name)
            .bind(new_product.price)
            .bind(new_product.stock)
            .bind(new_product.owner_id)
            .bind(new_product.is_public)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list_products(&self, scope: ProductScope) -> Result<Vec<Product>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE "
        ));
        push_scope(&mut qb, scope);
        qb.push(" ORDER BY created_at, id");

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_product(
        &self,
        id: ProductId,
        scope: ProductScope,
    ) -> Result<Option<Product>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = "
        ));
        qb.push_bind(id).push(" AND ");
        push_scope(&mut qb, scope);

        let product = qb
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self, changes))]
    async fn update_product(
        &self,
        id: ProductId,
        scope: ProductScope,
        changes: ProductChanges,
    ) -> Result<Option<Product>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE products SET name = COALESCE(");
        qb.push_bind(changes.name)
            .push(", name), price = COALESCE(")
            .push_bind(changes.price)
            .push(", price), stock = COALESCE(")
            .push_bind(changes.stock)
            .push(", stock), is_public = COALESCE(")
            .push_bind(changes.is_public)
            .push(", is_public), updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(" AND ");
        push_scope(&mut qb, scope);
        qb.push(format!(" RETURNING {PRODUCT_COLUMNS}"));

        let product = qb
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId, scope: ProductScope) -> Result<bool, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM products WHERE id = ");
        qb.push_bind(id).push(" AND ");
        push_scope(&mut qb, scope);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
