use crate::config::AppConfig;
use crate::services::cart_service::CartService;
use crate::services::catalog_service::DbCatalog;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub catalog: Arc<DbCatalog>,
  pub cart_service: Arc<CartService>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(db_pool: SqlitePool, config: Arc<AppConfig>) -> Self {
    let catalog = Arc::new(DbCatalog::new(db_pool.clone()));
    let cart_service = Arc::new(CartService::new(catalog.clone()));
    Self {
      db_pool,
      catalog,
      cart_service,
      config,
    }
  }
}
