//! # Vitrina Models
//!
//! Domain models and DTOs shared by the API, the store and the CLI.
//!
//! - [`ids`]: Strongly-typed entity IDs
//! - [`roles`]: The closed [`Role`] enumeration
//! - [`users`]: Users and user DTOs
//! - [`products`]: Products and product DTOs
//! - [`auth`]: Login, token and message DTOs

pub mod auth;
pub mod ids;
pub mod products;
pub mod roles;
pub mod users;

pub use auth::{
    AccessTokenResponse, LoginRequest, MessageResponse, ProtectedResponse, RefreshRequest,
    SessionLoginResponse, TokenPairResponse,
};
pub use ids::{ProductId, UserId};
pub use products::{
    CreateProductDto, NewProduct, Product, ProductChanges, ProductScope, UpdateProductDto,
};
pub use roles::Role;
pub use users::{
    ChangePasswordDto, CreateUserDto, NewUser, UpdateUserDto, User, UserChanges,
    UserListResponse, UserMessageResponse,
};
