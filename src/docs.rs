use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use vitrina_core::ErrorResponse;
use vitrina_models::{
    AccessTokenResponse, ChangePasswordDto, CreateProductDto, CreateUserDto, LoginRequest,
    MessageResponse, Product, ProtectedResponse, RefreshRequest, Role, SessionLoginResponse,
    TokenPairResponse, UpdateProductDto, UpdateUserDto, User, UserListResponse,
    UserMessageResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::token_login,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::protected,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::patch_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::me,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::session_login,
        crate::modules::users::controller::logout,
        crate::modules::products::controller::list_products,
        crate::modules::products::controller::create_product,
        crate::modules::products::controller::get_product,
        crate::modules::products::controller::update_product,
        crate::modules::products::controller::patch_product,
        crate::modules::products::controller::delete_product,
    ),
    components(
        schemas(
            Role,
            User,
            CreateUserDto,
            UpdateUserDto,
            ChangePasswordDto,
            UserListResponse,
            UserMessageResponse,
            Product,
            CreateProductDto,
            UpdateProductDto,
            LoginRequest,
            TokenPairResponse,
            RefreshRequest,
            AccessTokenResponse,
            SessionLoginResponse,
            ProtectedResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token login, refresh and access check"),
        (name = "Users", description = "Registration and account management"),
        (name = "Products", description = "Products scoped by the caller's role")
    ),
    info(
        title = "Vitrina API",
        version = "0.1.0",
        description = "Product catalogue with role-scoped visibility and JWT authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
