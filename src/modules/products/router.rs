use axum::{Router, routing::get};

use crate::modules::products::controller::{
    create_product, delete_product, get_product, list_products, patch_product, update_product,
};
use crate::router::route_both;
use crate::state::AppState;

pub fn init_products_router() -> Router<AppState> {
    let router = route_both(
        Router::new(),
        "/api/products",
        get(list_products).post(create_product),
    );
    route_both(
        router,
        "/api/products/{id}",
        get(get_product)
            .put(update_product)
            .patch(patch_product)
            .delete(delete_product),
    )
}
