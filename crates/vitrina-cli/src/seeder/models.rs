//! Seed rows and seeding configuration.

use rust_decimal::Decimal;
use vitrina_models::{Role, UserId};

/// Email domain shared by every seeded user; `clear-seed` matches on it.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// Password given to seeded users when none is supplied.
pub const DEFAULT_SEED_PASSWORD: &str = "12345678";

pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

pub struct ProductSeed {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub owner_id: UserId,
    pub is_public: bool,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub users: usize,
    pub products: usize,
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 5,
            products: 20,
            password: DEFAULT_SEED_PASSWORD.to_string(),
        }
    }
}

impl SeedConfig {
    pub fn new(users: usize, products: usize) -> Self {
        Self {
            users,
            products,
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}
