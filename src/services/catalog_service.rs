//! Read-only product catalog lookups.

use crate::errors::Result;
use crate::models::Product;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

const PRODUCT_COLUMNS: &str = "id, name, price_cents, image_url, is_active";

/// The catalog seam the cart service consumes. Only active products are
/// visible through it; a deactivated or deleted product simply does not
/// resolve.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
  /// Finds an active product by id.
  async fn find_active(&self, product_id: i64) -> Result<Option<Product>>;

  /// Fetches the active subset of `ids`. Unknown or inactive ids are
  /// simply absent from the result, never an error.
  async fn active_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>>;
}

/// SQLite-backed catalog.
#[derive(Debug, Clone)]
pub struct DbCatalog {
  pool: SqlitePool,
}

impl DbCatalog {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Active products, newest first, optionally filtered by a name
  /// substring (case-insensitive for ASCII, which is what SQLite's LIKE
  /// gives us).
  #[instrument(name = "catalog::list_active", skip(self))]
  pub async fn list_active(&self, search: Option<&str>) -> Result<Vec<Product>> {
    let search = search.map(str::trim).filter(|q| !q.is_empty());
    let products = match search {
      Some(q) => {
        sqlx::query_as::<_, Product>(&format!(
          "SELECT {} FROM products WHERE is_active = 1 AND name LIKE '%' || ?1 || '%' ORDER BY id DESC",
          PRODUCT_COLUMNS
        ))
        .bind(q)
        .fetch_all(&self.pool)
        .await?
      }
      None => {
        sqlx::query_as::<_, Product>(&format!(
          "SELECT {} FROM products WHERE is_active = 1 ORDER BY id DESC",
          PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?
      }
    };
    Ok(products)
  }

  /// The newest active products, for the public landing listing.
  #[instrument(name = "catalog::newest", skip(self))]
  pub async fn newest(&self, limit: i64) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE is_active = 1 ORDER BY id DESC LIMIT ?1",
      PRODUCT_COLUMNS
    ))
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }
}

#[async_trait]
impl ProductCatalog for DbCatalog {
  #[instrument(name = "catalog::find_active", skip(self))]
  async fn find_active(&self, product_id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE id = ?1 AND is_active = 1",
      PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  #[instrument(name = "catalog::active_by_ids", skip(self, ids), fields(id_count = ids.len()))]
  async fn active_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    // SQLite has no array binds, so the IN list is built placeholder by
    // placeholder.
    let mut query: sqlx::QueryBuilder<'_, sqlx::Sqlite> = sqlx::QueryBuilder::new(format!(
      "SELECT {} FROM products WHERE is_active = 1 AND id IN (",
      PRODUCT_COLUMNS
    ));
    let mut id_list = query.separated(", ");
    for id in ids {
      id_list.push_bind(*id);
    }
    id_list.push_unseparated(")");

    let products = query.build_query_as::<Product>().fetch_all(&self.pool).await?;
    Ok(products)
  }
}
