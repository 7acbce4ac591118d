//! Product seeding.

use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use vitrina_models::{ProductId, UserId};

use super::models::ProductSeed;

/// Price range in cents.
const PRICE_CENTS: std::ops::RangeInclusive<i64> = 1_000..=50_000;
const STOCK: std::ops::RangeInclusive<i32> = 1..=100;

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generates `count` products owned by random users from `owners`.
pub fn generate_products(count: usize, owners: &[UserId]) -> Vec<ProductSeed> {
    if owners.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .filter_map(|_| {
            let mut rng = rand::thread_rng();
            let owner_id = *owners.choose(&mut rng)?;
            let word: String = Word().fake();

            Some(ProductSeed {
                name: title_case(&word),
                price: Decimal::new(rng.gen_range(PRICE_CENTS), 2),
                stock: rng.gen_range(STOCK),
                owner_id,
                is_public: rng.gen_bool(0.5),
            })
        })
        .collect()
}

pub async fn seed_products(
    db: &PgPool,
    count: usize,
    owners: &[UserId],
) -> Result<Vec<ProductId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📦 Seeding {} products...", count);

    let products = generate_products(count, owners);

    let mut tx = db.begin().await?;
    let ids = insert_products_chunk(&mut tx, &products).await?;
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} products in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

async fn insert_products_chunk(
    tx: &mut Transaction<'_, Postgres>,
    products: &[ProductSeed],
) -> Result<Vec<ProductId>, Box<dyn std::error::Error>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO products (name, price, stock, owner_id, is_public) VALUES ");

    for i in 0..products.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for product in products {
        q = q
            .bind(&product.name)
            .bind(product.price)
            .bind(product.stock)
            .bind(product.owner_id)
            .bind(product.is_public);
    }

    let ids: Vec<ProductId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

pub async fn clear_products(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing products...");

    let result = sqlx::query("DELETE FROM products")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} products in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
