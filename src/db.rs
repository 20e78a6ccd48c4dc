//! SQLite pool setup, schema bootstrap, and demo inventory seeding.

use crate::errors::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, instrument};

/// The demo inventory: (name, price in minor units, image file name).
const SEED_PRODUCTS: &[(&str, i64, &str)] = &[
  ("Sneakersy Urban 1", 19999, "sneakersy_1.png"),
  ("Sneakersy Urban 2", 21999, "sneakersy_2.png"),
  ("Sneakersy Runner 3", 24999, "sneakersy_3.png"),
  ("Sneakersy Classic 4", 17999, "sneakersy_4.png"),
  ("Sneakersy Street 5", 28999, "sneakersy_5.png"),
  ("Sneakersy Sport 6", 15999, "sneakersy_6.png"),
  ("Czapka Classic 1", 6999, "hat_1.png"),
  ("Czapka Classic 2", 7499, "hat_2.png"),
  ("Czapka Street 3", 5999, "hat_3.png"),
  ("Czapka Winter 4", 8999, "hat_4.png"),
  ("Czapka Snapback 5", 7999, "hat_5.png"),
  ("Czapka Sport 6", 6499, "hat_6.png"),
];

/// Opens (and creates, if missing) the SQLite database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
  let pool = SqlitePoolOptions::new().connect_with(options).await?;
  Ok(pool)
}

/// Creates the `users` and `products` tables when they do not exist yet.
#[instrument(name = "db::ensure_schema", skip(pool))]
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
  sqlx::query(
    "CREATE TABLE IF NOT EXISTS users (
       id INTEGER PRIMARY KEY AUTOINCREMENT,
       first_name TEXT NOT NULL,
       last_name TEXT NOT NULL,
       email TEXT NOT NULL UNIQUE,
       username TEXT NOT NULL UNIQUE,
       password_hash TEXT NOT NULL
     )",
  )
  .execute(pool)
  .await?;

  sqlx::query(
    "CREATE TABLE IF NOT EXISTS products (
       id INTEGER PRIMARY KEY AUTOINCREMENT,
       name TEXT NOT NULL,
       price_cents INTEGER NOT NULL,
       image_url TEXT,
       is_active INTEGER NOT NULL DEFAULT 1
     )",
  )
  .execute(pool)
  .await?;

  Ok(())
}

/// Inserts the demo inventory, skipping rows whose name already exists, so
/// repeated boots do not duplicate products. Returns how many rows were
/// added.
#[instrument(name = "db::seed_products", skip(pool))]
pub async fn seed_products(pool: &SqlitePool) -> Result<u64> {
  let mut added = 0;
  for &(name, price_cents, image_url) in SEED_PRODUCTS {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE name = ?1")
      .bind(name)
      .fetch_optional(pool)
      .await?;
    if existing.is_some() {
      continue;
    }

    sqlx::query("INSERT INTO products (name, price_cents, image_url, is_active) VALUES (?1, ?2, ?3, 1)")
      .bind(name)
      .bind(price_cents)
      .bind(image_url)
      .execute(pool)
      .await?;
    added += 1;
  }

  if added > 0 {
    info!("Seeded {} demo products.", added);
  }
  Ok(added)
}
