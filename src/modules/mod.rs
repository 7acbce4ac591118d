//! Feature modules. Each one exposes a `controller` with the HTTP handlers,
//! a `service` with the store-facing logic and a `router`.

use anyhow::anyhow;
use vitrina_core::AppError;

pub mod auth;
pub mod products;
pub mod users;

/// 404 in the `{"detail": "Not found."}` shape.
pub(crate) fn not_found() -> AppError {
    AppError::not_found(anyhow!("Not found.")).with_detail_key()
}
