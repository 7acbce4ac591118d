//! User seeding.

use fake::Fake;
use fake::faker::internet::en::Username;
use fake::faker::name::en::*;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use vitrina_models::{Role, UserId};

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

/// Generates `count` users with random roles. Usernames carry the index so
/// they stay unique within one run.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let base: String = Username().fake();
            let username = format!("{}{}", base.to_lowercase(), idx + 1);
            let role = *Role::ALL
                .choose(&mut rand::thread_rng())
                .unwrap_or(&Role::Cliente);

            UserSeed {
                email: format!("{username}@{SEED_EMAIL_DOMAIN}"),
                username,
                password_hash: password_hash.to_string(),
                first_name,
                last_name,
                role,
            }
        })
        .collect()
}

/// Seeds users and returns their ids in insertion order.
pub async fn seed_users(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let users = generate_users(count, password_hash);

    let mut tx = db.begin().await?;
    let ids = insert_users_chunk(&mut tx, &users).await?;
    tx.commit().await?;

    for user in &users {
        println!("   ✓ {} | {}", user.username, user.role);
    }
    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (username, email, password_hash, first_name, last_name, role) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes every non-ADMIN user and every seeded user. Products go with
/// their owners.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE role <> 'ADMIN' OR email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
