use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use vitrina_core::{AppError, ErrorResponse, FieldErrors};
use vitrina_models::{CreateProductDto, Product, ProductId, ProductScope, UpdateProductDto};

use crate::metrics::track_product_created;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::modules::products::service::ProductService;
use crate::state::AppState;
use crate::validator::{FIELD_REQUIRED, ValidatedJson};

fn scope_of(subject: &AuthUser) -> ProductScope {
    ProductScope::for_subject(subject.role(), subject.user_id())
}

/// PUT replaces the product, so `name`, `price` and `stock` must be present.
fn require_full_update(dto: &UpdateProductDto) -> Result<(), AppError> {
    let mut fields = FieldErrors::new();
    if dto.name.is_none() {
        fields.insert("name".to_string(), vec![FIELD_REQUIRED.to_string()]);
    }
    if dto.price.is_none() {
        fields.insert("price".to_string(), vec![FIELD_REQUIRED.to_string()]);
    }
    if dto.stock.is_none() {
        fields.insert("stock".to_string(), vec![FIELD_REQUIRED.to_string()]);
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(fields, FIELD_REQUIRED))
    }
}

/// List the products visible to the caller
#[utoipa::path(
    get,
    path = "/api/products/",
    responses(
        (status = 200, description = "Products in the caller's scope", body = Vec<Product>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductService::list_products(state.store.as_ref(), scope_of(&auth_user)).await?;
    Ok(Json(products))
}

/// Create a product owned by the caller (STAFF or ADMIN)
#[utoipa::path(
    post,
    path = "/api/products/",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - STAFF or ADMIN only", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state, dto))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateProductDto>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product =
        ProductService::create_product(state.store.as_ref(), auth_user.user_id(), dto).await?;
    track_product_created(auth_user.role());
    Ok((StatusCode::CREATED, Json(product)))
}

/// Retrieve a product in the caller's scope
#[utoipa::path(
    get,
    path = "/api/products/{id}/",
    params(
        ("id" = ProductId, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or outside the caller's scope", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::get_product(state.store.as_ref(), id, scope_of(&auth_user)).await?;
    Ok(Json(product))
}

/// Replace a product (STAFF or ADMIN)
#[utoipa::path(
    put,
    path = "/api/products/{id}/",
    params(
        ("id" = ProductId, Path, description = "Product ID")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - STAFF or ADMIN only", body = ErrorResponse),
        (status = 404, description = "Not found or outside the caller's scope", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state, dto))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<ProductId>,
    ValidatedJson(dto): ValidatedJson<UpdateProductDto>,
) -> Result<Json<Product>, AppError> {
    require_full_update(&dto)?;
    let product = ProductService::update_product(
        state.store.as_ref(),
        id,
        scope_of(&auth_user),
        dto.into(),
    )
    .await?;
    Ok(Json(product))
}

/// Partially update a product (STAFF or ADMIN)
#[utoipa::path(
    patch,
    path = "/api/products/{id}/",
    params(
        ("id" = ProductId, Path, description = "Product ID")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - STAFF or ADMIN only", body = ErrorResponse),
        (status = 404, description = "Not found or outside the caller's scope", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state, dto))]
pub async fn patch_product(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<ProductId>,
    ValidatedJson(dto): ValidatedJson<UpdateProductDto>,
) -> Result<Json<Product>, AppError> {
    let product = ProductService::update_product(
        state.store.as_ref(),
        id,
        scope_of(&auth_user),
        dto.into(),
    )
    .await?;
    Ok(Json(product))
}

/// Delete a product (ADMIN only)
#[utoipa::path(
    delete,
    path = "/api/products/{id}/",
    params(
        ("id" = ProductId, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - ADMIN only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Products"
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(auth_user): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    ProductService::delete_product(state.store.as_ref(), id, scope_of(&auth_user)).await?;
    Ok(StatusCode::NO_CONTENT)
}
