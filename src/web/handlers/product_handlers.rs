use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::catalog_service::ProductCatalog;
use crate::state::AppState;
use crate::web::session::AuthenticatedUser;

const NEWS_LIMIT: i64 = 12;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub q: Option<String>,
}

#[instrument(
  name = "handler::list_products",
  skip(app_state, query, auth_user),
  fields(user_id = %auth_user.user_id, q = ?query.q)
)]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list_active(query.q.as_deref()).await?;
  info!("Catalog listing returned {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({
    "products": products,
    "query": query.q.as_deref().map(str::trim).unwrap_or(""),
  })))
}

// Public: available without signing in, so the storefront can show the
// newest arrivals next to the login form.
#[instrument(name = "handler::newest_products", skip(app_state))]
pub async fn newest_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.newest(NEWS_LIMIT).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(
  name = "handler::get_product",
  skip(app_state, path, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.catalog.find_active(product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => {
      warn!("Product {} not found or inactive.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}
