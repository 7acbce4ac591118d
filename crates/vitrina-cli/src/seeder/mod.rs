//! Database seeding.
//!
//! Seeding wipes the previous sample data first: every product, every
//! non-ADMIN user and every user on the seed email domain.

pub mod models;
pub mod products;
pub mod users;

pub use models::{DEFAULT_SEED_PASSWORD, ProductSeed, SeedConfig, UserSeed};

use bcrypt::hash;
use sqlx::PgPool;
use std::time::Instant;

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Users: {}", config.users);
    println!("   - Products: {}", config.products);

    println!("\n⚠️  Removing previous sample data...");
    clear_all(db).await?;

    // Cost 4 keeps seeding fast; every seeded user shares the hash.
    println!("\n🔐 Hashing password...");
    let password_hash =
        hash(&config.password, 4).map_err(|e| format!("Failed to hash password: {}", e))?;

    println!();
    let user_ids = users::seed_users(db, config.users, &password_hash).await?;

    println!();
    let product_ids = products::seed_products(db, config.products, &user_ids).await?;

    println!(
        "\n✅ Seeding complete! Created {} users and {} products in {:?}",
        user_ids.len(),
        product_ids.len(),
        start_time.elapsed()
    );
    println!("\n📝 Password for all seeded users: {}", config.password);

    Ok(())
}

pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    products::clear_products(db).await?;
    users::clear_users(db).await?;
    Ok(())
}
